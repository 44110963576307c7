use serde::{Deserialize, Serialize};

/// Identity of the Linux distribution inside the scanned content, as read
/// from an os-release file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinuxRelease {
    pub pretty_name: String,
    pub name: String,
    pub id: String,
    #[serde(rename = "idLike", skip_serializing_if = "Vec::is_empty")]
    pub id_like: Vec<String>,
    pub version: String,
    #[serde(rename = "versionID")]
    pub version_id: String,
}

impl LinuxRelease {
    pub fn is_empty(&self) -> bool {
        self == &LinuxRelease::default()
    }
}
