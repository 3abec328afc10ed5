pub mod fullname;
pub mod inspect;
pub mod write_manifest;

use aciforge_core::{AciError, ErrorKind};
use tracing::debug;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_SPEC_ERROR: u8 = 2;
pub const EXIT_ARCHIVE_ERROR: u8 = 3;

pub const SPEC_ERROR_PREFIX: &str = "spec error:";
pub const ARCHIVE_ERROR_PREFIX: &str = "archive error:";

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Render a core error as a CLI message whose prefix selects the exit code.
pub fn describe(err: &AciError) -> String {
    for (field, value) in err.context() {
        debug!("{} error context {field}: {value}", err.kind());
    }
    match err.kind() {
        ErrorKind::Spec | ErrorKind::InvalidIdentifier => format!("{SPEC_ERROR_PREFIX} {err}"),
        ErrorKind::Format | ErrorKind::NotFound | ErrorKind::Parse => {
            format!("{ARCHIVE_ERROR_PREFIX} {err}")
        }
        ErrorKind::Io | ErrorKind::Serialize => err.to_string(),
    }
}

pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with(SPEC_ERROR_PREFIX) {
        EXIT_SPEC_ERROR
    } else if msg.starts_with(ARCHIVE_ERROR_PREFIX) {
        EXIT_ARCHIVE_ERROR
    } else {
        EXIT_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_manifest_maps_to_archive_exit_code() {
        let err = AciError::ManifestNotFound {
            path: PathBuf::from("image.aci"),
        };
        let msg = describe(&err);
        assert!(msg.starts_with("archive error:"));
        assert_eq!(exit_code_for(&msg), EXIT_ARCHIVE_ERROR);
    }

    #[test]
    fn io_maps_to_generic_failure() {
        let err = AciError::Io {
            path: PathBuf::from("manifest"),
            source: std::io::Error::other("denied"),
        };
        assert_eq!(exit_code_for(&describe(&err)), EXIT_FAILURE);
    }

    #[test]
    fn spec_prefix_maps_to_spec_exit_code() {
        assert_eq!(exit_code_for("spec error: bad"), EXIT_SPEC_ERROR);
        assert_eq!(exit_code_for("something else"), EXIT_FAILURE);
    }
}
