//! Manifest extraction and manifest building for appc container images.
//!
//! The extractor reads the reserved `manifest` entry out of a (compressed)
//! ACI tar archive and derives the image's `name[:version]`. The builder turns
//! a declarative `BuildSpec` into a canonical `ImageManifest`: it validates
//! names, rebuilds labels, injects ownership, `build-date` and execution
//! defaults, converts dependencies, and writes a deterministic JSON file.
//!
//! All operations are stateless; each call opens at most one file.

pub mod builder;
pub mod dependencies;
pub mod extract;
pub mod prettify;
pub mod spec;

pub use builder::{build_manifest, build_manifest_at, render_manifest, write_manifest};
pub use dependencies::to_dependencies;
pub use extract::{extract_manifest, extract_manifest_content, full_name, MANIFEST_ENTRY};
pub use prettify::prettify_json;
pub use spec::{parse_spec_file, parse_spec_str, AciSection, BuildSection, BuildSpec};

use aciforge_schema::IdentifierError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AciError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{}' is not a readable compressed tar archive: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no manifest entry found in '{}'", .path.display())]
    ManifestNotFound { path: PathBuf },
    #[error("cannot decode manifest from '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        content: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("'{name}' is not a valid identifier: {source}")]
    InvalidIdentifier {
        name: String,
        #[source]
        source: IdentifierError,
    },
    #[error("failed to serialize manifest '{name}': {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse build spec {origin}: {source}")]
    Spec {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Coarse classification of an [`AciError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Format,
    NotFound,
    Parse,
    InvalidIdentifier,
    Serialize,
    Spec,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Io => write!(f, "io"),
            ErrorKind::Format => write!(f, "format"),
            ErrorKind::NotFound => write!(f, "not-found"),
            ErrorKind::Parse => write!(f, "parse"),
            ErrorKind::InvalidIdentifier => write!(f, "invalid-identifier"),
            ErrorKind::Serialize => write!(f, "serialize"),
            ErrorKind::Spec => write!(f, "spec"),
        }
    }
}

impl AciError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AciError::Io { .. } => ErrorKind::Io,
            AciError::Format { .. } => ErrorKind::Format,
            AciError::ManifestNotFound { .. } => ErrorKind::NotFound,
            AciError::Parse { .. } => ErrorKind::Parse,
            AciError::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            AciError::Serialize { .. } => ErrorKind::Serialize,
            AciError::Spec { .. } => ErrorKind::Spec,
        }
    }

    /// Contextual fields attached to the error, for diagnostics.
    pub fn context(&self) -> Vec<(&'static str, String)> {
        match self {
            AciError::Io { path, .. }
            | AciError::Format { path, .. }
            | AciError::ManifestNotFound { path } => {
                vec![("file", path.display().to_string())]
            }
            AciError::Parse { path, content, .. } => vec![
                ("file", path.display().to_string()),
                ("content", content.clone()),
            ],
            AciError::InvalidIdentifier { name, .. } | AciError::Serialize { name, .. } => {
                vec![("name", name.clone())]
            }
            AciError::Spec { origin, .. } => vec![("spec", origin.clone())],
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AciError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AciError::Format {
            path: path.into(),
            source,
        }
    }
}

/// Validate `name` as an identifier, keeping the offending string on failure.
pub(crate) fn identifier(name: &str) -> Result<aciforge_schema::AcIdentifier, AciError> {
    aciforge_schema::AcIdentifier::new(name).map_err(|source| AciError::InvalidIdentifier {
        name: name.to_owned(),
        source,
    })
}
