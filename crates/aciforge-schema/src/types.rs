//! Validated identifier type shared by image names, dependency names, labels
//! and annotations.
//!
//! Identifiers serialize as plain strings; deserialization runs the same
//! validation as [`AcIdentifier::new`].

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("identifier must not be empty")]
    Empty,
    #[error("invalid identifier '{name}': {reason}")]
    Invalid { name: String, reason: &'static str },
}

impl IdentifierError {
    /// The string that failed validation (empty for [`IdentifierError::Empty`]).
    pub fn name(&self) -> &str {
        match self {
            IdentifierError::Empty => "",
            IdentifierError::Invalid { name, .. } => name,
        }
    }
}

/// An image or dependency name following `[a-z0-9]+([-._~/][a-z0-9]+)*`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AcIdentifier(String);

impl AcIdentifier {
    /// Validate `s` and wrap it. Never lowercases or strips characters.
    pub fn new(s: impl Into<String>) -> Result<Self, IdentifierError> {
        let s = s.into();
        validate_identifier(&s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

fn is_alnum(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit()
}

fn is_separator(b: u8) -> bool {
    matches!(b, b'-' | b'.' | b'_' | b'~' | b'/')
}

fn validate_identifier(s: &str) -> Result<(), IdentifierError> {
    let bytes = s.as_bytes();
    let Some((&first, _)) = bytes.split_first() else {
        return Err(IdentifierError::Empty);
    };
    let invalid = |reason| IdentifierError::Invalid {
        name: s.to_owned(),
        reason,
    };

    if !is_alnum(first) {
        return Err(invalid("must start with a lowercase letter or digit"));
    }
    if !is_alnum(bytes[bytes.len() - 1]) {
        return Err(invalid("must end with a lowercase letter or digit"));
    }

    let mut prev_sep = false;
    for &b in bytes {
        if is_separator(b) {
            if prev_sep {
                return Err(invalid("separators must be followed by a letter or digit"));
            }
            prev_sep = true;
        } else if is_alnum(b) {
            prev_sep = false;
        } else {
            return Err(invalid(
                "only lowercase letters, digits and '-', '.', '_', '~', '/' are allowed",
            ));
        }
    }
    Ok(())
}

impl<'de> Deserialize<'de> for AcIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AcIdentifier::new(s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for AcIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AcIdentifier::new(s)
    }
}

impl TryFrom<&str> for AcIdentifier {
    type Error = IdentifierError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        AcIdentifier::new(s)
    }
}

impl Deref for AcIdentifier {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AcIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AcIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for AcIdentifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AcIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
