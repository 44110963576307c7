use super::{compile_glob, resolve_relative};
use crate::cataloging::domain::Location;
use crate::ports::outbound::{ContentResolver, FileKind, FileMetadata};
use crate::shared::error::CatalogError;
use crate::shared::security::{
    join_within_root, validate_file_size, validate_regular_file, MAX_FILE_SIZE,
};
use crate::shared::Result;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// DirectoryResolver adapter exposing a directory tree as scanned content
///
/// The tree is indexed once at construction without following symbolic
/// links. Every entry is addressed by its path relative to the root,
/// written with a leading "/".
pub struct DirectoryResolver {
    root: PathBuf,
    index: BTreeMap<String, FileMetadata>,
}

impl DirectoryResolver {
    /// Indexes `root`.
    ///
    /// # Errors
    /// `InvalidSourcePath` if `root` is missing or not a directory.
    /// Unreadable entries inside the tree are logged and skipped.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let metadata = fs::metadata(&root).map_err(|e| CatalogError::InvalidSourcePath {
            path: root.clone(),
            reason: e.to_string(),
        })?;
        if !metadata.is_dir() {
            return Err(CatalogError::InvalidSourcePath {
                path: root,
                reason: "not a directory".to_string(),
            }
            .into());
        }

        let mut index = BTreeMap::new();
        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            let Some(path) = inventory_path(&root, entry.path()) else {
                continue;
            };
            match entry.metadata() {
                Ok(metadata) => {
                    index.insert(path, file_metadata(&metadata));
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "skipping entry without metadata")
                }
            }
        }

        tracing::debug!(root = %root.display(), entries = index.len(), "indexed directory");
        Ok(Self { root, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn regular_location(&self, path: &str) -> Option<Location> {
        self.index
            .get(path)
            .filter(|m| m.kind == FileKind::Regular)
            .map(|_| Location::new(path))
    }

    fn read_error(location: &Location, details: impl ToString) -> anyhow::Error {
        CatalogError::LocationRead {
            path: location.real_path().to_string(),
            details: details.to_string(),
        }
        .into()
    }
}

impl ContentResolver for DirectoryResolver {
    fn files_by_glob(&self, pattern: &str) -> Result<Vec<Location>> {
        let matcher = compile_glob(pattern)?;
        Ok(self
            .index
            .iter()
            .filter(|(path, m)| m.kind == FileKind::Regular && matcher.is_match(path.as_str()))
            .map(|(path, _)| Location::new(path.clone()))
            .collect())
    }

    fn files_by_path(&self, paths: &[&str]) -> Vec<Location> {
        paths
            .iter()
            .filter_map(|path| self.regular_location(path))
            .collect()
    }

    fn relative_file_by_path(&self, location: &Location, path: &str) -> Option<Location> {
        let resolved = resolve_relative(location.real_path(), path)?;
        self.regular_location(&resolved)
    }

    fn file_contents(&self, location: &Location) -> Result<Box<dyn Read + Send>> {
        if self.regular_location(location.real_path()).is_none() {
            return Err(Self::read_error(location, "no such regular file in the scanned tree"));
        }

        let path = join_within_root(&self.root, location.real_path())
            .map_err(|e| Self::read_error(location, e))?;
        let metadata = validate_regular_file(&path, location.real_path())
            .map_err(|e| Self::read_error(location, e))?;
        validate_file_size(metadata.len(), &path, MAX_FILE_SIZE)
            .map_err(|e| Self::read_error(location, e))?;

        let file = File::open(&path).map_err(|e| Self::read_error(location, e))?;
        Ok(Box::new(file))
    }

    fn file_metadata(&self, location: &Location) -> Result<FileMetadata> {
        self.index
            .get(location.real_path())
            .copied()
            .ok_or_else(|| Self::read_error(location, "no such entry in the scanned tree"))
    }
}

/// "/"-rooted, "/"-separated path of `path` relative to `root`.
fn inventory_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(format!("/{}", parts.join("/")))
}

fn file_metadata(metadata: &fs::Metadata) -> FileMetadata {
    let file_type = metadata.file_type();
    let kind = if file_type.is_symlink() {
        FileKind::Symlink
    } else if file_type.is_dir() {
        FileKind::Directory
    } else if file_type.is_file() {
        FileKind::Regular
    } else {
        FileKind::Other
    };

    FileMetadata {
        kind,
        size: metadata.len(),
        mode: mode(metadata),
    }
}

#[cfg(unix)]
fn mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode(_metadata: &fs::Metadata) -> u32 {
    0
}
