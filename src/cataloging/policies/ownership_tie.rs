use crate::cataloging::domain::ArtifactId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// OwnershipTiePolicy decides what happens when several packages claim the
/// evidence files of another package with equal specificity.
///
/// Neither policy picks a winner. A tie is always reported as an
/// [`OwnershipConflict`] so the caller can inspect it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OwnershipTiePolicy {
    /// Every tied claimant gets an ownership edge.
    #[default]
    SurfaceAll,
    /// Tied claimants get no edge.
    Skip,
}

impl OwnershipTiePolicy {
    /// Parses the policy name used in configuration files.
    ///
    /// # Arguments
    /// * `raw` - `"surface-all"` or `"skip"`
    ///
    /// # Returns
    /// The policy, or `None` for an unknown name
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "surface-all" => Some(OwnershipTiePolicy::SurfaceAll),
            "skip" => Some(OwnershipTiePolicy::Skip),
            _ => None,
        }
    }

    /// Selects which of the top-specificity claimants become owners.
    ///
    /// # Arguments
    /// * `candidates` - Claimants sharing the highest specificity, never empty
    ///
    /// # Returns
    /// The owners an edge should be emitted for
    pub fn owners<'a>(&self, candidates: &'a [ArtifactId]) -> &'a [ArtifactId] {
        match self {
            OwnershipTiePolicy::SurfaceAll => candidates,
            OwnershipTiePolicy::Skip if candidates.len() > 1 => &[],
            OwnershipTiePolicy::Skip => candidates,
        }
    }
}

impl fmt::Display for OwnershipTiePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnershipTiePolicy::SurfaceAll => write!(f, "surface-all"),
            OwnershipTiePolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Several packages claim the same evidence files of `owned` with equal
/// specificity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipConflict {
    pub owned: ArtifactId,
    /// Tied claimants, ordered by identifier.
    pub candidates: Vec<ArtifactId>,
    /// Evidence paths of `owned` the claimants overlap on, sorted.
    pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ArtifactId> {
        raw.iter().map(|s| ArtifactId::new(*s)).collect()
    }

    #[test]
    fn test_surface_all_keeps_every_candidate() {
        let candidates = ids(&["a", "b"]);
        assert_eq!(OwnershipTiePolicy::SurfaceAll.owners(&candidates), &candidates[..]);
    }

    #[test]
    fn test_skip_drops_ties_only() {
        let tied = ids(&["a", "b"]);
        assert!(OwnershipTiePolicy::Skip.owners(&tied).is_empty());

        let single = ids(&["a"]);
        assert_eq!(OwnershipTiePolicy::Skip.owners(&single), &single[..]);
    }

    #[test]
    fn test_parse_and_display() {
        for policy in [OwnershipTiePolicy::SurfaceAll, OwnershipTiePolicy::Skip] {
            assert_eq!(OwnershipTiePolicy::parse(&policy.to_string()), Some(policy));
        }
        assert_eq!(OwnershipTiePolicy::parse("first"), None);
        assert_eq!(OwnershipTiePolicy::default(), OwnershipTiePolicy::SurfaceAll);
    }
}
