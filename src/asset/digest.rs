//! Content-addressed hrefs.
//!
//! The digest is embedded in the filename so the name changes iff the
//! content changes, which is what makes year-long caching safe.

/// Number of hash bytes kept (8 hex characters).
const DIGEST_BYTES: usize = 4;

/// Short hex digest of a payload.
#[inline]
pub fn digest(data: &[u8]) -> String {
    let hash = blake3::hash(data);
    hex::encode(&hash.as_bytes()[..DIGEST_BYTES])
}

/// Insert the payload digest before the final extension of `href`.
///
/// - `foo.png` -> `foo-<digest>.png`
/// - `foo.FINAL.png` -> `foo.FINAL-<digest>.png`
/// - `foo` -> `foo-<digest>`
///
/// Only the last path segment is inspected; directories are never altered.
pub fn digestify_href(href: &str, data: &[u8]) -> String {
    let digest = digest(data);
    let name_start = href.rfind('/').map_or(0, |i| i + 1);
    let name = &href[name_start..];

    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() => {
            let split = name_start + dot;
            format!("{}-{}{}", &href[..split], digest, &href[split..])
        }
        _ => format!("{href}-{digest}"),
    }
}
