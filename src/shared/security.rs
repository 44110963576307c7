use crate::shared::Result;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Largest file a resolver will hand to a parser (256 MB).
///
/// Package databases on large images can be big, but anything beyond this is
/// almost certainly not a metadata file and would only exhaust memory.
pub const MAX_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Checks that `path` is a regular file and not a symbolic link.
///
/// `symlink_metadata()` is used so the link itself is inspected rather than
/// its target.
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<fs::Metadata> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!("Failed to read {} metadata: {}", file_description, e)
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. Symbolic links are never opened for reading.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(metadata)
}

/// Rejects files larger than `max_size`.
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}

/// Lexically joins a "/"-rooted inventory path onto `root`, refusing any
/// path that would climb above it.
///
/// No filesystem access happens here; `..` components are resolved
/// against the path built so far.
pub fn join_within_root(root: &Path, inventory_path: &str) -> Result<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(inventory_path).components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Normal(part) => relative.push(part),
            Component::ParentDir => {
                if !relative.pop() {
                    anyhow::bail!(
                        "Security: {} escapes the scan root {}",
                        inventory_path,
                        root.display()
                    );
                }
            }
            Component::Prefix(_) => {
                anyhow::bail!("Unsupported path prefix in {}", inventory_path);
            }
        }
    }
    Ok(root.join(relative))
}
