use crate::dependencies::to_dependencies;
use crate::prettify::prettify_json;
use crate::spec::BuildSpec;
use crate::{identifier, AciError};
use aciforge_schema::{EventHandler, ImageManifest, Labels};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::Permissions;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Directory holding the helper binaries bundled into every image.
pub const BINARY_PATH: &str = "/dgr/bin";
/// Command used when the build spec does not set one.
pub const DEFAULT_EXEC: [&str; 2] = ["/dgr/bin/busybox", "sh"];
pub const PRESTART_SCRIPT: &str = "/dgr/bin/prestart";
pub const PRE_START: &str = "pre-start";
pub const BUILD_DATE: &str = "build-date";

const MANIFEST_MODE: u32 = 0o644;

/// Build the manifest for `spec`, stamping a missing `build-date` with now.
pub fn build_manifest(spec: &BuildSpec, project_name: &str) -> Result<ImageManifest, AciError> {
    build_manifest_at(spec, project_name, Utc::now())
}

/// Build the manifest for `spec` using `now` as the default `build-date`.
///
/// `spec` is left untouched; defaults are applied to a copy of its app.
pub fn build_manifest_at(
    spec: &BuildSpec,
    project_name: &str,
    now: DateTime<Utc>,
) -> Result<ImageManifest, AciError> {
    let name = identifier(project_name)?;

    let mut labels = Labels::new();
    if !spec.version().is_empty() {
        labels.set(identifier("version")?, spec.version());
    }
    labels.set(identifier("os")?, "linux");
    labels.set(identifier("arch")?, "amd64");

    let mut app = spec.aci.app.clone();
    if app.user.is_empty() {
        app.user = "0".to_owned();
    }
    if app.group.is_empty() {
        app.group = "0".to_owned();
    }

    let mut annotations = spec.aci.annotations.clone();
    if !annotations.contains(BUILD_DATE) {
        annotations.set(
            identifier(BUILD_DATE)?,
            now.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }

    let dependencies = to_dependencies(&spec.aci.dependencies)?;

    // One guard covers both defaults: excluding the helper binaries drops
    // the default exec and the pre-start hook together.
    let binary_path_excluded = spec
        .build
        .exclude
        .iter()
        .any(|rule| BINARY_PATH.starts_with(rule.as_str()));
    if binary_path_excluded {
        debug!("{BINARY_PATH} is excluded, skipping exec and {PRE_START} defaults");
    } else {
        if app.exec.is_empty() {
            app.exec = DEFAULT_EXEC.iter().map(|s| (*s).to_owned()).collect();
        }
        if !app.has_event_handler(PRE_START) {
            app.event_handlers.push(EventHandler::new(
                PRE_START,
                vec![PRESTART_SCRIPT.to_owned()],
            ));
        }
    }

    let mut manifest = ImageManifest::blank(name);
    manifest.labels = labels;
    manifest.annotations = annotations;
    manifest.dependencies = dependencies;
    manifest.app = Some(app);
    Ok(manifest)
}

/// Serialize a manifest to its on-disk form: two-space indented JSON with a
/// trailing newline, `{"name": .., ..}` pairs collapsed onto one line.
pub fn render_manifest(manifest: &ImageManifest) -> Result<Vec<u8>, AciError> {
    let mut json =
        serde_json::to_string_pretty(manifest).map_err(|source| AciError::Serialize {
            name: manifest.name.to_string(),
            source,
        })?;
    json.push('\n');
    Ok(prettify_json(&json).into_bytes())
}

/// Build the manifest for `spec` under `project_name` and write it to `target`.
///
/// Any validation failure aborts before `target` is touched. The file is
/// replaced whole through a temporary sibling and a rename, mode 0644.
pub fn write_manifest(
    spec: &BuildSpec,
    target: &Path,
    project_name: &str,
) -> Result<(), AciError> {
    let manifest = build_manifest(spec, project_name)?;
    let content = render_manifest(&manifest)?;
    write_file_atomic(target, &content)?;
    info!(
        "wrote manifest for {} to {}",
        manifest.name,
        target.display()
    );
    Ok(())
}

fn write_file_atomic(target: &Path, content: &[u8]) -> Result<(), AciError> {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let io_err = |e| AciError::io(target, e);

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(content).map_err(io_err)?;
    tmp.as_file()
        .set_permissions(Permissions::from_mode(MANIFEST_MODE))
        .map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(target).map_err(|e| io_err(e.error))?;
    Ok(())
}
