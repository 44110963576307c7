use super::artifact::{ArtifactId, Identifiable};
use super::location::LocationSet;
use super::metadata::PackageMetadata;
use crate::shared::Result;
use std::collections::BTreeSet;
use std::fmt;

/// Maximum length for package names (guards against garbage input)
const MAX_PACKAGE_NAME_LENGTH: usize = 512;

/// Ecosystem a package belongs to.
///
/// Types read from foreign documents that this crate has no worker for are
/// preserved in `Other` so they survive a decode/encode cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackageType {
    Apk,
    Gem,
    Hex,
    RustCrate,
    Unknown,
    Other(String),
}

impl PackageType {
    pub fn as_str(&self) -> &str {
        match self {
            PackageType::Apk => "apk",
            PackageType::Gem => "gem",
            PackageType::Hex => "hex",
            PackageType::RustCrate => "rust-crate",
            PackageType::Unknown => "UnknownPackage",
            PackageType::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "apk" => PackageType::Apk,
            "gem" => PackageType::Gem,
            "hex" => PackageType::Hex,
            "rust-crate" => PackageType::RustCrate,
            "" | "UnknownPackage" => PackageType::Unknown,
            other => PackageType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language a package is written in, when that is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Elixir,
    Ruby,
    Rust,
    None,
    Other(String),
}

impl Language {
    pub fn as_str(&self) -> &str {
        match self {
            Language::Elixir => "elixir",
            Language::Ruby => "ruby",
            Language::Rust => "rust",
            Language::None => "",
            Language::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "elixir" => Language::Elixir,
            "ruby" => Language::Ruby,
            "rust" => Language::Rust,
            "" => Language::None,
            other => Language::Other(other.to_string()),
        }
    }
}

/// A discovered software unit.
///
/// The identifier is computed once by [`PackageBuilder::build`] (or
/// replaced through [`Package::override_id`] on the decode path). Only the
/// location set may change after construction, and only by union inside a
/// [`Collection`](super::Collection).
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    id: ArtifactId,
    name: String,
    version: String,
    found_by: String,
    package_type: PackageType,
    language: Language,
    licenses: BTreeSet<String>,
    purl: String,
    metadata: Option<PackageMetadata>,
    locations: LocationSet,
}

impl Package {
    pub fn builder(
        name: impl Into<String>,
        version: impl Into<String>,
        package_type: PackageType,
    ) -> PackageBuilder {
        PackageBuilder {
            name: name.into(),
            version: version.into(),
            package_type,
            found_by: String::new(),
            language: Language::None,
            licenses: BTreeSet::new(),
            purl: String::new(),
            metadata: None,
            locations: LocationSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn found_by(&self) -> &str {
        &self.found_by
    }

    pub fn package_type(&self) -> &PackageType {
        &self.package_type
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn licenses(&self) -> &BTreeSet<String> {
        &self.licenses
    }

    pub fn purl(&self) -> &str {
        &self.purl
    }

    pub fn metadata(&self) -> Option<&PackageMetadata> {
        self.metadata.as_ref()
    }

    pub fn locations(&self) -> &LocationSet {
        &self.locations
    }

    /// Identifier derived from the identifying fields, regardless of any
    /// override applied to this package.
    pub fn content_id(&self) -> ArtifactId {
        let metadata_type = self
            .metadata
            .as_ref()
            .map(|m| m.metadata_type().as_str())
            .unwrap_or("");
        let metadata = self
            .metadata
            .as_ref()
            .map(PackageMetadata::normalized)
            .unwrap_or_default();

        ArtifactId::from_fields([
            self.package_type.as_str(),
            self.name.as_str(),
            self.version.as_str(),
            metadata_type,
            metadata.as_str(),
            self.purl.as_str(),
        ])
    }

    /// Replaces the computed identifier with one supplied by an external
    /// document.
    pub fn override_id(mut self, id: ArtifactId) -> Self {
        self.id = id;
        self
    }

    /// Replaces the evidence locations. Used before the package is handed to
    /// a collection, e.g. when re-homing packages found inside a nested
    /// inventory document.
    pub fn with_locations(mut self, locations: LocationSet) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_found_by(mut self, found_by: impl Into<String>) -> Self {
        self.found_by = found_by.into();
        self
    }

    pub(crate) fn merge_locations(&mut self, other: &LocationSet) {
        self.locations.union(other);
    }

    pub(crate) fn set_found_by(&mut self, found_by: &str) {
        self.found_by = found_by.to_string();
    }

    /// Lists every non-location field on which `other` disagrees.
    ///
    /// `found_by` is provenance, like locations, and is not compared.
    pub fn identity_conflicts(&self, other: &Package) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name != other.name {
            fields.push("name");
        }
        if self.version != other.version {
            fields.push("version");
        }
        if self.package_type != other.package_type {
            fields.push("type");
        }
        if self.language != other.language {
            fields.push("language");
        }
        if self.licenses != other.licenses {
            fields.push("licenses");
        }
        if self.purl != other.purl {
            fields.push("purl");
        }
        if self.metadata != other.metadata {
            fields.push("metadata");
        }
        fields
    }
}

impl Identifiable for Package {
    fn id(&self) -> ArtifactId {
        self.id.clone()
    }
}

/// Builder for [`Package`]; `build` computes the identifier.
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    name: String,
    version: String,
    package_type: PackageType,
    found_by: String,
    language: Language,
    licenses: BTreeSet<String>,
    purl: String,
    metadata: Option<PackageMetadata>,
    locations: LocationSet,
}

impl PackageBuilder {
    pub fn found_by(mut self, found_by: impl Into<String>) -> Self {
        self.found_by = found_by.into();
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn licenses<I, S>(mut self, licenses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.licenses.extend(
            licenses
                .into_iter()
                .map(Into::into)
                .filter(|l: &String| !l.trim().is_empty()),
        );
        self
    }

    pub fn purl(mut self, purl: impl Into<String>) -> Self {
        self.purl = purl.into();
        self
    }

    pub fn metadata(mut self, metadata: PackageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn locations(mut self, locations: LocationSet) -> Self {
        self.locations = locations;
        self
    }

    pub fn build(self) -> Result<Package> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }

        if self.name.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                self.name.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }

        let mut package = Package {
            id: ArtifactId::new(String::new()),
            name: self.name,
            version: self.version,
            found_by: self.found_by,
            package_type: self.package_type,
            language: self.language,
            licenses: self.licenses,
            purl: self.purl,
            metadata: self.metadata,
            locations: self.locations,
        };
        package.id = package.content_id();
        Ok(package)
    }
}
