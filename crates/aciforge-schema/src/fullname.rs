use crate::manifest::ImageManifest;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// An image reference of the form `name` or `name:version`.
///
/// The version separator is the last `:` after the last `/`, so a registry
/// port such as `registry:5000/app` stays part of the name. No validation
/// happens here; names are checked when converted to identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullName {
    raw: String,
    version_sep: Option<usize>,
}

impl FullName {
    pub fn parse(s: &str) -> Self {
        let tail_start = s.rfind('/').map_or(0, |i| i + 1);
        let version_sep = s[tail_start..].rfind(':').map(|i| tail_start + i);
        Self {
            raw: s.to_owned(),
            version_sep,
        }
    }

    /// Join a name and an optional version; an empty version is dropped.
    pub fn new(name: &str, version: Option<&str>) -> Self {
        match version.filter(|v| !v.is_empty()) {
            Some(v) => Self {
                raw: format!("{name}:{v}"),
                version_sep: Some(name.len()),
            },
            None => Self {
                raw: name.to_owned(),
                version_sep: None,
            },
        }
    }

    /// Derive the correlation name of a manifest: its identity, followed by
    /// `:<version>` whenever a `version` label is present, even an empty one.
    pub fn from_manifest(manifest: &ImageManifest) -> Self {
        let name = manifest.name.as_str();
        match manifest.version() {
            Some(v) => Self {
                raw: format!("{name}:{v}"),
                version_sep: Some(name.len()),
            },
            None => Self {
                raw: name.to_owned(),
                version_sep: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        match self.version_sep {
            Some(i) => &self.raw[..i],
            None => &self.raw,
        }
    }

    /// Version part; empty when the reference carries none.
    pub fn version(&self) -> &str {
        match self.version_sep {
            Some(i) => &self.raw[i + 1..],
            None => "",
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for FullName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FullName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl Serialize for FullName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for FullName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}
