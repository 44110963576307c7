use super::artifact::{ArtifactId, Identifiable};
use super::package::{Package, PackageType};
use crate::shared::error::CatalogError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::BTreeSet;

/// Deduplicated store of every package found in one run.
///
/// `add` may be called concurrently from many workers; each insert-or-merge
/// happens while holding the shard lock of the package's identifier.
#[derive(Debug, Default)]
pub struct Collection {
    packages: DashMap<ArtifactId, Package>,
    by_type: DashMap<PackageType, BTreeSet<ArtifactId>>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `package`, or merges its locations into the entry with the
    /// same identifier.
    ///
    /// # Errors
    /// `InvariantViolation` when the identifier is empty, or when an entry
    /// with the same identifier disagrees on any non-location field.
    pub fn add(&self, package: Package) -> Result<(), CatalogError> {
        let id = package.id();
        if id.is_empty() {
            return Err(CatalogError::InvariantViolation {
                id: format!("{}@{}", package.name(), package.version()),
                details: "package has an empty identifier".to_string(),
            });
        }

        match self.packages.entry(id.clone()) {
            Entry::Occupied(mut entry) => {
                let conflicts = entry.get().identity_conflicts(&package);
                if !conflicts.is_empty() {
                    return Err(CatalogError::InvariantViolation {
                        id: id.to_string(),
                        details: format!(
                            "existing entry {}@{} differs on: {}",
                            entry.get().name(),
                            entry.get().version(),
                            conflicts.join(", ")
                        ),
                    });
                }

                let existing = entry.get_mut();
                existing.merge_locations(package.locations());
                // smallest non-empty worker name wins so merges are order independent
                let incoming = package.found_by();
                if !incoming.is_empty()
                    && (existing.found_by().is_empty() || incoming < existing.found_by())
                {
                    existing.set_found_by(incoming);
                }
            }
            Entry::Vacant(entry) => {
                self.by_type
                    .entry(package.package_type().clone())
                    .or_default()
                    .insert(id);
                entry.insert(package);
            }
        }
        Ok(())
    }

    pub fn package(&self, id: &ArtifactId) -> Option<Package> {
        self.packages.get(id).map(|p| p.value().clone())
    }

    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.packages.contains_key(id)
    }

    pub fn remove(&self, id: &ArtifactId) -> Option<Package> {
        let (_, package) = self.packages.remove(id)?;
        if let Some(mut ids) = self.by_type.get_mut(package.package_type()) {
            ids.remove(id);
        }
        Some(package)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Every package, ordered by identifier.
    ///
    /// All external-facing enumeration goes through here so output does not
    /// depend on insertion order.
    pub fn sorted(&self) -> Vec<Package> {
        let mut packages: Vec<Package> = self.packages.iter().map(|p| p.value().clone()).collect();
        packages.sort_by_cached_key(|p| p.id());
        packages
    }

    /// Packages of the given types, ordered by identifier. An empty filter
    /// returns everything.
    pub fn enumerate(&self, types: &[PackageType]) -> Vec<Package> {
        if types.is_empty() {
            return self.sorted();
        }

        let ids: BTreeSet<ArtifactId> = types
            .iter()
            .filter_map(|t| self.by_type.get(t).map(|ids| ids.value().clone()))
            .flatten()
            .collect();

        ids.iter().filter_map(|id| self.package(id)).collect()
    }

    /// Packages with a location whose real path is `real_path`, ordered by
    /// identifier.
    pub fn packages_by_path(&self, real_path: &str) -> Vec<Package> {
        let mut packages: Vec<Package> = self
            .packages
            .iter()
            .filter(|p| p.value().locations().contains_path(real_path))
            .map(|p| p.value().clone())
            .collect();
        packages.sort_by_cached_key(|p| p.id());
        packages
    }
}

impl FromIterator<Package> for Collection {
    /// Builds a collection, logging and skipping packages that violate the
    /// identity invariant.
    fn from_iter<T: IntoIterator<Item = Package>>(iter: T) -> Self {
        let collection = Collection::new();
        for package in iter {
            if let Err(e) = collection.add(package) {
                tracing::warn!(error = %e, "skipping conflicting package");
            }
        }
        collection
    }
}
