//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! Module ids and matched paths are `/`-separated and relative to the
//! bucket's base path, so builds are reproducible regardless of where the
//! input tree lives on disk.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without touching the filesystem.
///
/// Leading `..` of a relative path are kept; `..` above the root of an
/// absolute path is dropped.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(comp),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// `/`-separated path of `path` relative to `base`.
///
/// Both are normalized lexically first. Paths outside `base` get leading
/// `..` segments.
///
/// # Examples
/// ```ignore
/// assert_eq!(relative_id(Path::new("/site"), Path::new("/site/js/app.js")), "js/app.js");
/// assert_eq!(relative_id(Path::new("/site/a"), Path::new("/site/b/x.js")), "../b/x.js");
/// ```
pub fn relative_id(base: &Path, path: &Path) -> String {
    let base = normalize_lexical(base);
    let path = normalize_lexical(path);

    let base_parts: Vec<_> = base.components().filter(|c| *c != Component::CurDir).collect();
    let path_parts: Vec<_> = path.components().filter(|c| *c != Component::CurDir).collect();

    let common = base_parts
        .iter()
        .zip(&path_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = std::iter::repeat_n("..".to_string(), base_parts.len() - common);
    let rest = path_parts[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().into_owned());

    ups.chain(rest).collect::<Vec<_>>().join("/")
}

/// Join the components of a relative path with `/`.
pub fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
