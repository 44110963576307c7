use crate::cataloging::domain::{
    ArtifactId, Collection, Endpoint, Identifiable, Package, Relationship, RelationshipType,
    SourceDescription,
};
use crate::cataloging::policies::{OwnershipConflict, OwnershipTiePolicy};
use globset::{GlobBuilder, GlobMatcher};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// RelationshipBuilder derives the relationship graph of a finished
/// collection.
///
/// This service contains pure business logic. It performs no I/O and reads
/// nothing but the collection, the relationships workers reported and the
/// source description.
pub struct RelationshipBuilder {
    tie_policy: OwnershipTiePolicy,
}

/// Validated relationships plus the ownership ties found while deriving them.
#[derive(Debug, Default)]
pub struct RelationshipGraph {
    pub relationships: Vec<Relationship>,
    pub conflicts: Vec<OwnershipConflict>,
    /// Relationships dropped because an endpoint did not resolve.
    pub dropped: usize,
}

impl RelationshipBuilder {
    pub fn new(tie_policy: OwnershipTiePolicy) -> Self {
        Self { tie_policy }
    }

    /// Builds the final relationship list
    ///
    /// # Arguments
    /// * `collection` - Every package of the run
    /// * `worker_relationships` - Structural edges reported by workers
    /// * `source` - Description of the scanned source, if any
    ///
    /// # Returns
    /// Derived ownership and evident-by edges plus the worker edges, with
    /// every edge whose endpoints do not resolve removed
    pub fn build(
        &self,
        collection: &Collection,
        worker_relationships: Vec<Relationship>,
        source: Option<&SourceDescription>,
    ) -> RelationshipGraph {
        let packages = collection.sorted();

        let (mut candidates, conflicts) = self.ownership_by_file_overlap(&packages);
        candidates.extend(Self::evident_by(&packages));
        candidates.extend(worker_relationships);

        let mut relationships = Vec::with_capacity(candidates.len());
        let mut dropped = 0;
        for relationship in candidates {
            match Self::validate(&relationship, collection, source) {
                Ok(()) => relationships.push(relationship),
                Err(reason) => {
                    tracing::warn!(
                        from = %relationship.from.id(),
                        to = %relationship.to.id(),
                        kind = %relationship.kind,
                        reason = %reason,
                        "dropping relationship with unresolved endpoint"
                    );
                    dropped += 1;
                }
            }
        }

        RelationshipGraph {
            relationships,
            conflicts,
            dropped,
        }
    }

    /// Emits an edge from each package that installs files to each other
    /// package whose evidence locations are among those files.
    ///
    /// Among claimants of one owned package, an exact path claim beats a glob
    /// claim and a longer claim beats a shorter one. Claimants left tied at
    /// the top are reported as a conflict and handled by the tie policy.
    fn ownership_by_file_overlap(
        &self,
        packages: &[Package],
    ) -> (Vec<Relationship>, Vec<OwnershipConflict>) {
        let claims: Vec<FileClaims> = packages.iter().filter_map(FileClaims::new).collect();
        let mut relationships = Vec::new();
        let mut conflicts = Vec::new();
        if claims.is_empty() {
            return (relationships, conflicts);
        }

        for owned in packages {
            let owned_id = owned.id();
            let evidence = owned.locations().real_paths();

            let mut claimants: BTreeMap<ArtifactId, (Specificity, BTreeSet<String>)> =
                BTreeMap::new();
            for claim in claims.iter().filter(|c| c.owner != owned_id) {
                for path in &evidence {
                    if let Some(specificity) = claim.specificity(path) {
                        let entry = claimants
                            .entry(claim.owner.clone())
                            .or_insert((specificity, BTreeSet::new()));
                        entry.0 = entry.0.max(specificity);
                        entry.1.insert(path.to_string());
                    }
                }
            }

            let Some(top) = claimants.values().map(|(s, _)| *s).max() else {
                continue;
            };
            let candidates: Vec<ArtifactId> = claimants
                .iter()
                .filter(|(_, (s, _))| *s == top)
                .map(|(id, _)| id.clone())
                .collect();

            if candidates.len() > 1 {
                let files: BTreeSet<String> = candidates
                    .iter()
                    .filter_map(|id| claimants.get(id))
                    .flat_map(|(_, files)| files.iter().cloned())
                    .collect();
                tracing::warn!(
                    owned = %owned_id,
                    candidates = candidates.len(),
                    policy = %self.tie_policy,
                    "several packages claim the same files with equal specificity"
                );
                conflicts.push(OwnershipConflict {
                    owned: owned_id.clone(),
                    candidates: candidates.clone(),
                    files: files.into_iter().collect(),
                });
            }

            for owner in self.tie_policy.owners(&candidates) {
                let files: Vec<&String> = claimants
                    .get(owner)
                    .map(|(_, files)| files.iter().collect())
                    .unwrap_or_default();
                relationships.push(
                    Relationship::new(
                        Endpoint::Package(owner.clone()),
                        Endpoint::Package(owned_id.clone()),
                        RelationshipType::OwnershipByFileOverlap,
                    )
                    .with_data(serde_json::json!({ "files": files })),
                );
            }
        }

        (relationships, conflicts)
    }

    /// Links every package to each location it was parsed from.
    fn evident_by(packages: &[Package]) -> Vec<Relationship> {
        packages
            .iter()
            .flat_map(|package| {
                package
                    .locations()
                    .iter()
                    .filter(|l| l.is_primary_evidence())
                    .map(move |l| {
                        Relationship::new(
                            Endpoint::Package(package.id()),
                            Endpoint::Coordinates(l.coordinates.clone()),
                            RelationshipType::EvidentBy,
                        )
                    })
            })
            .collect()
    }

    fn validate(
        relationship: &Relationship,
        collection: &Collection,
        source: Option<&SourceDescription>,
    ) -> Result<(), String> {
        for endpoint in [&relationship.from, &relationship.to] {
            if !endpoint.is_identifiable() {
                return Err(format!("endpoint {:?} has no identifier", endpoint));
            }
            match endpoint {
                Endpoint::Package(id) if !collection.contains(id) => {
                    return Err(format!("package {} is not in the collection", id));
                }
                Endpoint::Source(id) if source.map(|s| &s.id) != Some(id) => {
                    return Err(format!("source {} is not the scanned source", id));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// How precisely a claim names a path; exact beats glob, then longer wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Specificity {
    exact: bool,
    length: usize,
}

/// Files one package claims to install.
struct FileClaims {
    owner: ArtifactId,
    exact: HashSet<String>,
    globs: Vec<(GlobMatcher, usize)>,
}

impl FileClaims {
    fn new(package: &Package) -> Option<Self> {
        let owner = package.metadata()?.as_file_owner()?;
        let mut exact = HashSet::new();
        let mut globs = Vec::new();

        for entry in owner.owned_files() {
            if !entry.contains(&['*', '?', '[', '{'][..]) {
                exact.insert(entry.to_string());
                continue;
            }
            match GlobBuilder::new(entry).literal_separator(true).build() {
                Ok(glob) => globs.push((glob.compile_matcher(), entry.len())),
                Err(e) => tracing::warn!(
                    package = %package.id(),
                    pattern = entry,
                    error = %e,
                    "ignoring unparsable owned-file pattern"
                ),
            }
        }

        Some(Self {
            owner: package.id(),
            exact,
            globs,
        })
    }

    fn specificity(&self, path: &str) -> Option<Specificity> {
        if self.exact.contains(path) {
            return Some(Specificity {
                exact: true,
                length: path.len(),
            });
        }
        self.globs
            .iter()
            .filter(|(matcher, _)| matcher.is_match(path))
            .map(|(_, length)| Specificity {
                exact: false,
                length: *length,
            })
            .max()
    }
}
