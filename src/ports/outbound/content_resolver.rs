use crate::cataloging::domain::Location;
use crate::shared::Result;
use std::io::Read;

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    Other,
}

/// Metadata of a resolved location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub kind: FileKind,
    pub size: u64,
    /// Unix permission bits, 0 where the platform has none.
    pub mode: u32,
}

/// ContentResolver port for read-only access to the scanned content
///
/// Implementations are shared by every worker of a run and must never
/// change observable state in response to a call. Locations are addressed by
/// "/"-rooted real paths.
pub trait ContentResolver: Send + Sync {
    /// Lists every location whose real path matches a glob pattern
    ///
    /// # Arguments
    /// * `pattern` - Glob such as `**/mix.lock`
    ///
    /// # Returns
    /// Matching locations, ordered by path
    ///
    /// # Errors
    /// Returns an error if the pattern is not a valid glob
    fn files_by_glob(&self, pattern: &str) -> Result<Vec<Location>>;

    /// Looks up locations by exact real path; missing paths are skipped
    fn files_by_path(&self, paths: &[&str]) -> Vec<Location>;

    /// Resolves `path` in the context of an already resolved location
    fn relative_file_by_path(&self, location: &Location, path: &str) -> Option<Location>;

    /// Opens a location for reading
    ///
    /// # Errors
    /// Returns an error if the location does not exist or cannot be read
    fn file_contents(&self, location: &Location) -> Result<Box<dyn Read + Send>>;

    /// Returns the metadata of a location
    ///
    /// # Errors
    /// Returns an error if the location does not exist
    fn file_metadata(&self, location: &Location) -> Result<FileMetadata>;
}
