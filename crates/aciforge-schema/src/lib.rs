//! appc image manifest data model for aciforge.
//!
//! This crate defines the schema layer shared by the manifest builder and the
//! archive extractor: validated identifiers (`AcIdentifier`), ordered unique
//! label and annotation lists, the application descriptor (`App`), the
//! `ImageManifest` document itself, and `FullName` references.

pub mod app;
pub mod fullname;
pub mod labels;
pub mod manifest;
pub mod types;

pub use app::{App, EnvironmentVariable, EventHandler, Isolator, MountPoint, Port};
pub use fullname::FullName;
pub use labels::{Annotations, LabelError, Labels, NameValue};
pub use manifest::{AcKind, Dependency, ImageManifest, AC_VERSION};
pub use types::{AcIdentifier, IdentifierError};
