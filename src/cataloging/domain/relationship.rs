use super::artifact::{ArtifactId, Identifiable};
use super::location::Coordinates;
use serde_json::Value;
use std::fmt;

/// Kind of a directed edge between two identifiable entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationshipType {
    /// The parent package installs files that are the evidence of the child.
    OwnershipByFileOverlap,
    /// The package was observed only through the artifact at the child coordinates.
    EvidentBy,
    Contains,
    /// The parent is a dependency of the child.
    DependencyOf,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 4] = [
        RelationshipType::OwnershipByFileOverlap,
        RelationshipType::EvidentBy,
        RelationshipType::Contains,
        RelationshipType::DependencyOf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::OwnershipByFileOverlap => "ownership-by-file-overlap",
            RelationshipType::EvidentBy => "evident-by",
            RelationshipType::Contains => "contains",
            RelationshipType::DependencyOf => "dependency-of",
        }
    }

    /// Exact lookup by wire name.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }

    /// Best-effort lookup for wire names written by other tools.
    ///
    /// Returns the matched type and whether it was coerced from a string that
    /// only contains a known name (e.g. `"runtime-dependency-of"`).
    pub fn normalize(raw: &str) -> Option<(Self, bool)> {
        if let Some(exact) = Self::parse(raw) {
            return Some((exact, false));
        }

        let lowered = raw.to_ascii_lowercase();
        let mut candidates = Self::ALL;
        // longest names first so "ownership-by-file-overlap" is not read as "contains"
        candidates.sort_by_key(|t| std::cmp::Reverse(t.as_str().len()));
        candidates
            .into_iter()
            .find(|t| lowered.contains(t.as_str()))
            .map(|t| (t, true))
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One end of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    /// A package, referenced by identifier; the collection owns the package.
    Package(ArtifactId),
    Coordinates(Coordinates),
    /// The described source (directory, file or image).
    Source(ArtifactId),
}

impl Endpoint {
    /// Whether the endpoint carries a usable identifier on its own.
    pub fn is_identifiable(&self) -> bool {
        match self {
            Endpoint::Package(id) | Endpoint::Source(id) => !id.is_empty(),
            Endpoint::Coordinates(c) => c.is_valid(),
        }
    }

    pub fn package_id(&self) -> Option<&ArtifactId> {
        match self {
            Endpoint::Package(id) => Some(id),
            _ => None,
        }
    }
}

impl Identifiable for Endpoint {
    fn id(&self) -> ArtifactId {
        match self {
            Endpoint::Package(id) | Endpoint::Source(id) => id.clone(),
            Endpoint::Coordinates(c) => c.id(),
        }
    }
}

impl From<Coordinates> for Endpoint {
    fn from(coordinates: Coordinates) -> Self {
        Endpoint::Coordinates(coordinates)
    }
}

impl From<&super::package::Package> for Endpoint {
    fn from(package: &super::package::Package) -> Self {
        Endpoint::Package(package.id())
    }
}

/// Directed, typed edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub from: Endpoint,
    pub to: Endpoint,
    pub kind: RelationshipType,
    pub data: Option<Value>,
}

impl Relationship {
    pub fn new(from: impl Into<Endpoint>, to: impl Into<Endpoint>, kind: RelationshipType) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Key used for canonical ordering and deduplication.
    pub fn sort_key(&self) -> (ArtifactId, ArtifactId, RelationshipType) {
        (self.from.id(), self.to.id(), self.kind)
    }
}

/// Orders relationships by (from id, to id, type) and drops exact
/// duplicates of that key, keeping the first occurrence's data.
pub fn sorted_relationships(relationships: &[Relationship]) -> Vec<Relationship> {
    let mut keyed: Vec<_> = relationships
        .iter()
        .map(|r| (r.sort_key(), r))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.dedup_by(|a, b| a.0 == b.0);
    keyed.into_iter().map(|(_, r)| r.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_exact() {
        assert_eq!(
            RelationshipType::normalize("contains"),
            Some((RelationshipType::Contains, false))
        );
    }

    #[test]
    fn test_normalize_coerces_substring() {
        assert_eq!(
            RelationshipType::normalize("runtime-dependency-of"),
            Some((RelationshipType::DependencyOf, true))
        );
        assert_eq!(
            RelationshipType::normalize("Evident-By-Manifest"),
            Some((RelationshipType::EvidentBy, true))
        );
    }

    #[test]
    fn test_normalize_unknown() {
        assert_eq!(RelationshipType::normalize("described-by"), None);
        assert_eq!(RelationshipType::normalize(""), None);
    }

    #[test]
    fn test_endpoint_identifiability() {
        assert!(Endpoint::Package(ArtifactId::new("abc")).is_identifiable());
        assert!(!Endpoint::Package(ArtifactId::new("")).is_identifiable());
        assert!(!Endpoint::Coordinates(Coordinates::new("")).is_identifiable());
    }

    #[test]
    fn test_sorted_relationships_dedups() {
        let a = Relationship::new(
            Endpoint::Package(ArtifactId::new("b")),
            Endpoint::Package(ArtifactId::new("a")),
            RelationshipType::DependencyOf,
        );
        let b = Relationship::new(
            Endpoint::Package(ArtifactId::new("a")),
            Endpoint::Package(ArtifactId::new("b")),
            RelationshipType::DependencyOf,
        );
        let sorted = sorted_relationships(&[a.clone(), b.clone(), a.clone()]);
        assert_eq!(sorted, vec![b, a]);
    }
}
