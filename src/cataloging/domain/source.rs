use super::artifact::{ArtifactId, Identifiable};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Image details recorded for an image source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageMetadata {
    pub user_input: String,
    #[serde(rename = "imageID")]
    pub image_id: String,
    pub manifest_digest: String,
    pub media_type: String,
    pub tags: Vec<String>,
    pub image_size: u64,
}

/// What was scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceScheme {
    Directory { path: String },
    File { path: String },
    Image(ImageMetadata),
}

impl SourceScheme {
    pub fn type_name(&self) -> &'static str {
        match self {
            SourceScheme::Directory { .. } => "directory",
            SourceScheme::File { .. } => "file",
            SourceScheme::Image(_) => "image",
        }
    }

    /// Scheme-specific payload as it appears in a document.
    pub fn target(&self) -> Value {
        match self {
            SourceScheme::Directory { path } | SourceScheme::File { path } => {
                Value::String(path.clone())
            }
            SourceScheme::Image(metadata) => {
                serde_json::to_value(metadata).unwrap_or(Value::Null)
            }
        }
    }

    /// Rebuilds a scheme from a document's `type` and `target`.
    ///
    /// Returns `None` for unknown types or targets of the wrong shape.
    pub fn from_target(type_name: &str, target: &Value) -> Option<Self> {
        match type_name {
            "directory" => target.as_str().map(|p| SourceScheme::Directory {
                path: p.to_string(),
            }),
            "file" => target.as_str().map(|p| SourceScheme::File {
                path: p.to_string(),
            }),
            "image" => serde_json::from_value(target.clone())
                .ok()
                .map(SourceScheme::Image),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescription {
    pub id: ArtifactId,
    pub scheme: SourceScheme,
}

impl SourceDescription {
    pub fn directory(path: impl Into<String>) -> Self {
        let scheme = SourceScheme::Directory { path: path.into() };
        let id = content_id(&scheme);
        Self { id, scheme }
    }

    pub fn with_id(mut self, id: ArtifactId) -> Self {
        self.id = id;
        self
    }
}

fn content_id(scheme: &SourceScheme) -> ArtifactId {
    ArtifactId::from_fields([
        "source".to_string(),
        scheme.type_name().to_string(),
        scheme.target().to_string(),
    ])
}

impl Identifiable for SourceDescription {
    fn id(&self) -> ArtifactId {
        self.id.clone()
    }
}

/// The tool run that produced an inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub configuration: Value,
}

impl Default for Descriptor {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            configuration: Value::Null,
        }
    }
}
