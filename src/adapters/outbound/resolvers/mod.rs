/// Content resolver adapters
mod directory;
mod in_memory;

pub use directory::DirectoryResolver;
pub use in_memory::InMemoryResolver;

use crate::shared::Result;
use globset::{GlobBuilder, GlobMatcher};

/// Compiles a location glob. `*` stays within one path segment; `**` spans
/// any number of segments.
fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid glob pattern '{}': {}", pattern, e))?;
    Ok(glob.compile_matcher())
}

/// Lexically resolves `path` against the directory of `base`, producing a
/// "/"-rooted path. Returns `None` if the result would climb above "/".
fn resolve_relative(base: &str, path: &str) -> Option<String> {
    let mut parts: Vec<&str> = if path.starts_with('/') {
        Vec::new()
    } else {
        let mut parts: Vec<&str> = base.split('/').filter(|p| !p.is_empty()).collect();
        parts.pop();
        parts
    };

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(format!("/{}", parts.join("/")))
}
