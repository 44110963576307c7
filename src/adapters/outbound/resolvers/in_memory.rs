use super::{compile_glob, resolve_relative};
use crate::cataloging::domain::Location;
use crate::ports::outbound::{ContentResolver, FileKind, FileMetadata};
use crate::shared::error::CatalogError;
use crate::shared::Result;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};

/// InMemoryResolver adapter over a fixed path to bytes map
///
/// Counts how many times each path is opened, which tests use to check
/// that workers only read what their globs select.
#[derive(Debug, Default)]
pub struct InMemoryResolver {
    files: BTreeMap<String, Vec<u8>>,
    opens: DashMap<String, usize>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file; `path` should start with "/".
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Number of times `path` has been opened.
    pub fn open_count(&self, path: &str) -> usize {
        self.opens.get(path).map(|c| *c).unwrap_or(0)
    }

    /// Total number of opens across all paths.
    pub fn total_opens(&self) -> usize {
        self.opens.iter().map(|c| *c.value()).sum()
    }

    fn lookup(&self, location: &Location) -> Result<&Vec<u8>> {
        self.files.get(location.real_path()).ok_or_else(|| {
            CatalogError::LocationRead {
                path: location.real_path().to_string(),
                details: "no such file".to_string(),
            }
            .into()
        })
    }
}

impl ContentResolver for InMemoryResolver {
    fn files_by_glob(&self, pattern: &str) -> Result<Vec<Location>> {
        let matcher = compile_glob(pattern)?;
        Ok(self
            .files
            .keys()
            .filter(|path| matcher.is_match(path.as_str()))
            .map(|path| Location::new(path.clone()))
            .collect())
    }

    fn files_by_path(&self, paths: &[&str]) -> Vec<Location> {
        paths
            .iter()
            .filter(|path| self.files.contains_key(**path))
            .map(|path| Location::new(*path))
            .collect()
    }

    fn relative_file_by_path(&self, location: &Location, path: &str) -> Option<Location> {
        let resolved = resolve_relative(location.real_path(), path)?;
        self.files
            .contains_key(&resolved)
            .then(|| Location::new(resolved))
    }

    fn file_contents(&self, location: &Location) -> Result<Box<dyn Read + Send>> {
        let content = self.lookup(location)?.clone();
        *self
            .opens
            .entry(location.real_path().to_string())
            .or_insert(0) += 1;
        Ok(Box::new(Cursor::new(content)))
    }

    fn file_metadata(&self, location: &Location) -> Result<FileMetadata> {
        let content = self.lookup(location)?;
        Ok(FileMetadata {
            kind: FileKind::Regular,
            size: content.len() as u64,
            mode: 0o644,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_counting() {
        let resolver = InMemoryResolver::new()
            .with_file("/a/mix.lock", "x")
            .with_file("/b/mix.lock", "y");

        let location = Location::new("/a/mix.lock");
        resolver.file_contents(&location).unwrap();
        resolver.file_contents(&location).unwrap();

        assert_eq!(resolver.open_count("/a/mix.lock"), 2);
        assert_eq!(resolver.open_count("/b/mix.lock"), 0);
        assert_eq!(resolver.total_opens(), 2);
    }

    #[test]
    fn test_listing_does_not_open() {
        let resolver = InMemoryResolver::new().with_file("/a/mix.lock", "x");
        assert_eq!(resolver.files_by_glob("**/*.lock").unwrap().len(), 1);
        assert_eq!(resolver.file_metadata(&Location::new("/a/mix.lock")).unwrap().size, 1);
        assert_eq!(resolver.total_opens(), 0);
    }

    #[test]
    fn test_missing_file_is_location_read_error() {
        let resolver = InMemoryResolver::new();
        let err = resolver.file_contents(&Location::new("/nope")).err().unwrap();
        assert!(err.to_string().contains("/nope"));
    }
}
