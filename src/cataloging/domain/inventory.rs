use super::collection::Collection;
use super::location::Coordinates;
use super::relationship::{sorted_relationships, Relationship};
use super::release::LinuxRelease;
use super::source::{Descriptor, SourceDescription};

/// Everything known about one scanned source: the deduplicated packages,
/// the relationship graph, and where the data came from.
#[derive(Debug, Default)]
pub struct Inventory {
    pub packages: Collection,
    pub relationships: Vec<Relationship>,
    pub source: Option<SourceDescription>,
    pub descriptor: Descriptor,
    pub distro: Option<LinuxRelease>,
    /// File entries carried over from a decoded document.
    pub files: Vec<Coordinates>,
}

impl Inventory {
    pub fn new(packages: Collection, relationships: Vec<Relationship>) -> Self {
        Self {
            packages,
            relationships,
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: SourceDescription) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_distro(mut self, distro: Option<LinuxRelease>) -> Self {
        self.distro = distro;
        self
    }

    pub fn with_descriptor(mut self, descriptor: Descriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    /// Relationships in canonical order with duplicates removed.
    pub fn sorted_relationships(&self) -> Vec<Relationship> {
        sorted_relationships(&self.relationships)
    }
}
