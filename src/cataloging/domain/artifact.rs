use sha2::{Digest, Sha256};
use std::fmt;

/// Number of hex characters kept from the SHA-256 digest.
pub const ID_LENGTH: usize = 16;

/// Stable identifier of anything a relationship can point at.
///
/// Computed identifiers are truncated SHA-256 digests; identifiers taken from
/// a decoded document are kept verbatim and may have any shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives an identifier from an ordered list of fields.
    ///
    /// Each field is length-prefixed before hashing so that
    /// `["ab", "c"]` and `["a", "bc"]` never collide.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hasher = Sha256::new();
        for field in fields {
            let field = field.as_ref();
            hasher.update(field.len().to_string().as_bytes());
            hasher.update(b":");
            hasher.update(field.as_bytes());
            hasher.update(b";");
        }
        let digest = format!("{:x}", hasher.finalize());
        Self(digest[..ID_LENGTH].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ArtifactId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Capability of exposing a stable identifier.
///
/// Relationship endpoints must be `Identifiable`.
pub trait Identifiable {
    fn id(&self) -> ArtifactId;
}
