//! Serialized shape of an inventory document.
//!
//! Every field defaults so that documents written by older or foreign
//! producers still deserialize; semantic checks happen during identity
//! reconciliation, not here.

use super::release::LinuxRelease;
use super::source::Descriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Schema marker written into every document.
pub const SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub artifacts: Vec<DocumentPackage>,
    pub artifact_relationships: Vec<DocumentRelationship>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<DocumentFile>,
    pub source: DocumentSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distro: Option<LinuxRelease>,
    pub descriptor: Option<Descriptor>,
    pub schema: DocumentSchema,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSchema {
    pub version: String,
}

impl Default for DocumentSchema {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentPackage {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub package_type: String,
    pub found_by: String,
    pub locations: Vec<DocumentLocation>,
    pub licenses: Vec<String>,
    pub language: String,
    pub purl: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub metadata_type: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentLocation {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_path: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentRelationship {
    pub parent: String,
    pub child: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentFile {
    pub id: String,
    pub location: DocumentLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub target: Value,
}
