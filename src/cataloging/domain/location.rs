use super::artifact::{ArtifactId, Identifiable};
use std::collections::{BTreeMap, BTreeSet};

/// Annotation key recording how strongly a location evidences a package.
pub const EVIDENCE_ANNOTATION_KEY: &str = "evidence";
/// The location is the file the package was parsed from.
pub const PRIMARY_EVIDENCE_ANNOTATION: &str = "primary";
/// The location corroborates a package parsed elsewhere.
pub const SUPPORTING_EVIDENCE_ANNOTATION: &str = "supporting";

/// Where on the inspected content a fact was observed.
///
/// `virtual_path` is set when the fact lives inside a nested artifact
/// (e.g. a file inside an archive found at `real_path`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinates {
    pub real_path: String,
    pub virtual_path: Option<String>,
}

impl Coordinates {
    pub fn new(real_path: impl Into<String>) -> Self {
        Self {
            real_path: real_path.into(),
            virtual_path: None,
        }
    }

    pub fn with_virtual_path(mut self, virtual_path: impl Into<String>) -> Self {
        self.virtual_path = Some(virtual_path.into());
        self
    }

    /// Coordinates are usable as a relationship endpoint only with a real path.
    pub fn is_valid(&self) -> bool {
        !self.real_path.is_empty()
    }
}

impl Identifiable for Coordinates {
    fn id(&self) -> ArtifactId {
        ArtifactId::from_fields([
            "coordinates",
            self.real_path.as_str(),
            self.virtual_path.as_deref().unwrap_or(""),
        ])
    }
}

/// Coordinates plus free-form annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub coordinates: Coordinates,
    pub annotations: BTreeMap<String, String>,
}

impl Location {
    pub fn new(real_path: impl Into<String>) -> Self {
        Self {
            coordinates: Coordinates::new(real_path),
            annotations: BTreeMap::new(),
        }
    }

    pub fn from_coordinates(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            annotations: BTreeMap::new(),
        }
    }

    pub fn real_path(&self) -> &str {
        &self.coordinates.real_path
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Shorthand for the annotation every parser puts on the file it read.
    pub fn as_primary_evidence(self) -> Self {
        self.with_annotation(EVIDENCE_ANNOTATION_KEY, PRIMARY_EVIDENCE_ANNOTATION)
    }

    pub fn is_primary_evidence(&self) -> bool {
        self.annotations
            .get(EVIDENCE_ANNOTATION_KEY)
            .is_some_and(|v| v == PRIMARY_EVIDENCE_ANNOTATION)
    }
}

impl Identifiable for Location {
    fn id(&self) -> ArtifactId {
        self.coordinates.id()
    }
}

/// Ordered, duplicate-free set of locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSet(BTreeSet<Location>);

impl LocationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: Location) -> bool {
        self.0.insert(location)
    }

    /// Adds every location of `other` to this set.
    pub fn union(&mut self, other: &LocationSet) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_path(&self, real_path: &str) -> bool {
        self.0.iter().any(|l| l.real_path() == real_path)
    }

    pub fn real_paths(&self) -> BTreeSet<&str> {
        self.0.iter().map(|l| l.real_path()).collect()
    }
}

impl FromIterator<Location> for LocationSet {
    fn from_iter<T: IntoIterator<Item = Location>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LocationSet {
    type Item = &'a Location;
    type IntoIter = std::collections::btree_set::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
