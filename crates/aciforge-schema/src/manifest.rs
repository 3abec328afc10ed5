use crate::app::App;
use crate::labels::{Annotations, Labels};
use crate::types::AcIdentifier;
use serde::{Deserialize, Serialize};

/// Schema version written into freshly built manifests.
pub const AC_VERSION: &str = "0.8.11";

/// Document kind tag; any other value is rejected on decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcKind {
    #[default]
    ImageManifest,
}

/// The structured image manifest stored at the root of an ACI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageManifest {
    pub ac_kind: AcKind,
    pub ac_version: String,
    pub name: AcIdentifier,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<App>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_whitelist: Vec<String>,
}

impl ImageManifest {
    /// A manifest carrying only kind, schema version and name.
    pub fn blank(name: AcIdentifier) -> Self {
        Self {
            ac_kind: AcKind::ImageManifest,
            ac_version: AC_VERSION.to_owned(),
            name,
            labels: Labels::new(),
            app: None,
            annotations: Annotations::new(),
            dependencies: Vec::new(),
            path_whitelist: Vec::new(),
        }
    }

    pub fn from_slice(content: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(content)
    }

    /// Value of the `version` label, if set.
    pub fn version(&self) -> Option<&str> {
        self.labels.get("version")
    }
}

/// Another image this one is layered on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub image_name: AcIdentifier,
    #[serde(rename = "imageID", default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub size: u64,
}

impl Dependency {
    pub fn new(image_name: AcIdentifier) -> Self {
        Self {
            image_name,
            image_id: None,
            labels: Labels::new(),
            size: 0,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(v: &u64) -> bool {
    *v == 0
}
