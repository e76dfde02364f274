//! Glob resolution against the base path.
//!
//! Walks the tree serially (no background workers) and returns matching
//! regular files as sorted, `/`-separated paths relative to the base.

use std::path::Path;

use jwalk::{Parallelism, WalkDir};
use wax::{CandidatePath, Glob, Pattern};

use crate::utils::path::to_forward_slashes;

/// Matched relative paths for `pattern` under `base`.
///
/// Returns the pattern's parse error message when it is not a valid glob.
pub fn resolve(base: &Path, pattern: &str) -> Result<Vec<String>, String> {
    let glob = Glob::new(pattern).map_err(|err| err.to_string())?;

    let mut paths: Vec<String> = WalkDir::new(base)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let path = e.path();
            let rel = path.strip_prefix(base).ok()?;
            Some(to_forward_slashes(rel))
        })
        .filter(|rel| glob.matched(&CandidatePath::from(rel.as_str())).is_some())
        .collect();

    paths.sort();
    Ok(paths)
}
