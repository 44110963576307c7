use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Tag naming the shape of a package's ecosystem-specific metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataType {
    MixLock,
    CargoLock,
    Apk,
}

impl MetadataType {
    pub const ALL: [MetadataType; 3] = [
        MetadataType::MixLock,
        MetadataType::CargoLock,
        MetadataType::Apk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataType::MixLock => "MixLockMetadata",
            MetadataType::CargoLock => "CargoPackageMetadata",
            MetadataType::Apk => "ApkMetadata",
        }
    }

    /// Looks up a tag by its wire name. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

impl fmt::Display for MetadataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry of a `mix.lock` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixLockMetadata {
    pub name: String,
    pub version: String,
    pub pkg_hash: String,
    pub pkg_hash_ext: String,
}

/// `[[package]]` entry of a `Cargo.lock` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoLockMetadata {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A file an installed apk package claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApkFileRecord {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Record of the apk installed database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApkMetadata {
    pub package: String,
    pub origin_package: String,
    pub version: String,
    pub architecture: String,
    pub license: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub files: Vec<ApkFileRecord>,
}

/// Packages that install files and therefore own them.
pub trait FileOwner {
    fn owned_files(&self) -> Vec<&str>;
}

impl FileOwner for ApkMetadata {
    fn owned_files(&self) -> Vec<&str> {
        self.files
            .iter()
            .map(|f| f.path.as_str())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// Ecosystem-specific payload, one variant per [`MetadataType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageMetadata {
    MixLock(MixLockMetadata),
    CargoLock(CargoLockMetadata),
    Apk(ApkMetadata),
}

impl PackageMetadata {
    pub fn metadata_type(&self) -> MetadataType {
        match self {
            PackageMetadata::MixLock(_) => MetadataType::MixLock,
            PackageMetadata::CargoLock(_) => MetadataType::CargoLock,
            PackageMetadata::Apk(_) => MetadataType::Apk,
        }
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            PackageMetadata::MixLock(m) => serde_json::to_value(m),
            PackageMetadata::CargoLock(m) => serde_json::to_value(m),
            PackageMetadata::Apk(m) => serde_json::to_value(m),
        }
    }

    pub fn from_value(metadata_type: MetadataType, value: Value) -> serde_json::Result<Self> {
        Ok(match metadata_type {
            MetadataType::MixLock => PackageMetadata::MixLock(serde_json::from_value(value)?),
            MetadataType::CargoLock => PackageMetadata::CargoLock(serde_json::from_value(value)?),
            MetadataType::Apk => PackageMetadata::Apk(serde_json::from_value(value)?),
        })
    }

    /// Canonical text form used for identity hashing.
    ///
    /// Goes through `serde_json::Value`, whose object keys are sorted.
    pub fn normalized(&self) -> String {
        self.to_value().map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn as_file_owner(&self) -> Option<&dyn FileOwner> {
        match self {
            PackageMetadata::Apk(m) => Some(m),
            PackageMetadata::MixLock(_) | PackageMetadata::CargoLock(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apk() -> ApkMetadata {
        ApkMetadata {
            package: "busybox".to_string(),
            origin_package: "busybox".to_string(),
            version: "1.36.1-r2".to_string(),
            architecture: "x86_64".to_string(),
            license: "GPL-2.0-only".to_string(),
            url: String::new(),
            description: String::new(),
            files: vec![
                ApkFileRecord {
                    path: "/bin/busybox".to_string(),
                    digest: None,
                },
                ApkFileRecord {
                    path: String::new(),
                    digest: None,
                },
            ],
        }
    }

    #[test]
    fn test_metadata_type_round_trips_through_tag() {
        for ty in MetadataType::ALL {
            assert_eq!(MetadataType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(MetadataType::parse("NpmPackageJsonMetadata"), None);
    }

    #[test]
    fn test_from_value_respects_tag() {
        let value = serde_json::json!({
            "name": "plug",
            "version": "1.15.2",
            "pkgHash": "abc",
            "pkgHashExt": "def"
        });
        let metadata = PackageMetadata::from_value(MetadataType::MixLock, value.clone()).unwrap();
        assert_eq!(metadata.metadata_type(), MetadataType::MixLock);
        assert!(PackageMetadata::from_value(MetadataType::Apk, value).is_err());
    }

    #[test]
    fn test_normalized_is_key_order_independent() {
        let m = PackageMetadata::Apk(apk());
        let normalized = m.normalized();
        let architecture = normalized.find("\"architecture\"").unwrap();
        assert!(architecture < normalized.find("\"version\"").unwrap());
    }

    #[test]
    fn test_apk_is_file_owner_and_skips_empty_paths() {
        let m = PackageMetadata::Apk(apk());
        let owner = m.as_file_owner().unwrap();
        assert_eq!(owner.owned_files(), vec!["/bin/busybox"]);

        let mix = PackageMetadata::MixLock(MixLockMetadata {
            name: "plug".to_string(),
            version: "1.0.0".to_string(),
            pkg_hash: String::new(),
            pkg_hash_ext: String::new(),
        });
        assert!(mix.as_file_owner().is_none());
    }
}
