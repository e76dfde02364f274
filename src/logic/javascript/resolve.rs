//! CommonJS `require` resolution.
//!
//! Relative and absolute specifiers resolve against the requiring module's
//! directory; bare specifiers are searched in `node_modules` directories from
//! that directory upward.
//!
//! A target resolves, in order, as:
//!
//! 1. the exact file, then the file with `.js` or `.json` appended
//! 2. a directory: `main` of its `package.json`, then `index.js`, `index.json`

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::utils::path::normalize_lexical;

const EXTENSIONS: [&str; 2] = ["js", "json"];
const INDEX_FILES: [&str; 2] = ["index.js", "index.json"];

/// Resolve `specifier` as required from the module at `from`.
pub async fn resolve(from: &Path, specifier: &str) -> Option<PathBuf> {
    let dir = from.parent().unwrap_or(Path::new(""));

    if is_path_specifier(specifier) {
        return resolve_target(&normalize_lexical(&dir.join(specifier))).await;
    }

    for ancestor in dir.ancestors() {
        if ancestor.file_name().is_some_and(|name| name == "node_modules") {
            continue;
        }
        let target = normalize_lexical(&ancestor.join("node_modules").join(specifier));
        if let Some(found) = resolve_target(&target).await {
            return Some(found);
        }
    }
    None
}

fn is_path_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
}

async fn resolve_target(target: &Path) -> Option<PathBuf> {
    if let Some(file) = as_file(target).await {
        return Some(file);
    }
    as_directory(target).await
}

async fn as_file(target: &Path) -> Option<PathBuf> {
    if is_file(target).await {
        return Some(target.to_path_buf());
    }
    for ext in EXTENSIONS {
        let candidate = with_appended_extension(target, ext);
        if is_file(&candidate).await {
            return Some(candidate);
        }
    }
    None
}

async fn as_directory(dir: &Path) -> Option<PathBuf> {
    if let Some(main) = package_main(dir).await {
        let target = normalize_lexical(&dir.join(main));
        if let Some(found) = as_file(&target).await {
            return Some(found);
        }
        if let Some(found) = as_index(&target).await {
            return Some(found);
        }
    }
    as_index(dir).await
}

async fn as_index(dir: &Path) -> Option<PathBuf> {
    for name in INDEX_FILES {
        let candidate = dir.join(name);
        if is_file(&candidate).await {
            return Some(candidate);
        }
    }
    None
}

async fn package_main(dir: &Path) -> Option<String> {
    #[derive(Deserialize)]
    struct Manifest {
        main: Option<String>,
    }

    let content = tokio::fs::read_to_string(dir.join("package.json")).await.ok()?;
    let manifest: Manifest = serde_json::from_str(&content).ok()?;
    manifest.main.filter(|main| !main.is_empty())
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

/// `app` + `js` -> `app.js`, `jquery.min` + `js` -> `jquery.min.js`
fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
