use crate::AciError;
use aciforge_schema::{Annotations, App, FullName};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Declarative description of an image build.
///
/// ```toml
/// name = "example.com/app:1.2.3"
///
/// [build]
/// exclude = ["/dgr/bin"]
///
/// [aci]
/// dependencies = ["example.com/base:1.0"]
///
/// [aci.app]
/// exec = ["/bin/server"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildSpec {
    pub name: FullName,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub aci: AciSection,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Path prefixes left out of the image; also gate the execution defaults.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AciSection {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub dependencies: Vec<FullName>,
    #[serde(default)]
    pub annotations: Annotations,
}

impl BuildSpec {
    pub fn new(name: FullName) -> Self {
        Self {
            name,
            build: BuildSection::default(),
            aci: AciSection::default(),
        }
    }

    /// Image name without the version.
    pub fn name(&self) -> &str {
        self.name.name()
    }

    /// Image version; empty when none was given.
    pub fn version(&self) -> &str {
        self.name.version()
    }
}

pub fn parse_spec_str(input: &str) -> Result<BuildSpec, AciError> {
    parse_spec(input, "<inline>")
}

pub fn parse_spec_file(path: impl AsRef<Path>) -> Result<BuildSpec, AciError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| AciError::io(path, e))?;
    parse_spec(&content, &format!("'{}'", path.display()))
}

fn parse_spec(input: &str, origin: &str) -> Result<BuildSpec, AciError> {
    toml::from_str(input).map_err(|source| AciError::Spec {
        origin: origin.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn parses_full_spec() {
        let input = r#"
name = "example.com/app:1.2.3"

[build]
exclude = ["/dgr/bin", "/tmp"]

[aci]
dependencies = ["example.com/base:1.0", "example.com/tools"]

[[aci.annotations]]
name = "authors"
value = "ops@example.com"

[aci.app]
exec = ["/bin/server", "--port", "80"]
user = "1000"
workingDirectory = "/srv"
supplementaryGIDs = [10]

[[aci.app.environment]]
name = "LANG"
value = "C.UTF-8"

[[aci.app.ports]]
name = "http"
protocol = "tcp"
port = 80

[[aci.app.isolators]]
name = "resource/memory"
value = { limit = "1G" }
"#;
        let spec = parse_spec_str(input).expect("should parse");
        assert_eq!(spec.name(), "example.com/app");
        assert_eq!(spec.version(), "1.2.3");
        assert_eq!(spec.build.exclude, vec!["/dgr/bin", "/tmp"]);
        assert_eq!(spec.aci.dependencies.len(), 2);
        assert_eq!(spec.aci.dependencies[1].version(), "");
        assert_eq!(spec.aci.annotations.get("authors"), Some("ops@example.com"));
        assert_eq!(spec.aci.app.exec, vec!["/bin/server", "--port", "80"]);
        assert_eq!(spec.aci.app.user, "1000");
        assert_eq!(spec.aci.app.group, "");
        assert_eq!(spec.aci.app.working_directory, "/srv");
        assert_eq!(spec.aci.app.supplementary_gids, vec![10]);
        assert_eq!(spec.aci.app.environment[0].value, "C.UTF-8");
        assert_eq!(spec.aci.app.ports[0].port, 80);
        assert_eq!(spec.aci.app.isolators[0].value["limit"], "1G");
    }

    #[test]
    fn parses_minimal_spec() {
        let spec = parse_spec_str(r#"name = "example.com/app""#).expect("should parse");
        assert_eq!(spec.version(), "");
        assert!(spec.build.exclude.is_empty());
        assert!(spec.aci.app.exec.is_empty());
        assert!(spec.aci.annotations.is_empty());
    }

    #[test]
    fn rejects_unknown_fields() {
        let input = r#"
name = "example.com/app"
[build]
include = ["/x"]
"#;
        let err = parse_spec_str(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Spec);
    }

    #[test]
    fn rejects_missing_name() {
        assert!(parse_spec_str("[build]\nexclude = []\n").is_err());
    }

    #[test]
    fn missing_file_is_io_error_with_path() {
        let err = parse_spec_file("/nonexistent/aci-manifest.toml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/nonexistent/aci-manifest.toml"));
    }
}
