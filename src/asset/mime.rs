//! Content-type inference for digested and raw assets.
//!
//! Only the extensions below are published; anything else is rejected so a
//! misnamed file never ships with a guessed `Content-Type`.

use crate::error::StepError;

/// MIME type constants.
pub mod types {
    pub const CSS: &str = "text/css";
    pub const CSV: &str = "text/csv";
    pub const GIF: &str = "image/gif";
    pub const JPEG: &str = "image/jpeg";
    pub const JAVASCRIPT: &str = "application/javascript";
    pub const JSON: &str = "application/json";
    pub const PNG: &str = "image/png";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
    pub const TSV: &str = "text/tab-separated-values";
    pub const PLAIN: &str = "text/plain";
    pub const WOFF: &str = "application/font-woff";
}

/// Look up the MIME type for an extension (case-insensitive).
pub fn from_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "css" => types::CSS,
        "csv" => types::CSV,
        "gif" => types::GIF,
        "jpg" => types::JPEG,
        "js" => types::JAVASCRIPT,
        "png" => types::PNG,
        "svg" => types::SVG,
        "ico" => types::ICO,
        "tsv" => types::TSV,
        "txt" => types::PLAIN,
        "woff" => types::WOFF,
        _ => return None,
    };
    Some(mime)
}

/// Infer the MIME type from the final extension of an href.
pub fn from_href(href: &str) -> Result<&'static str, StepError> {
    let Some(ext) = extension(href) else {
        return Err(StepError::MissingExtension {
            href: href.to_string(),
        });
    };
    from_extension(ext).ok_or_else(|| StepError::UnsupportedExtension {
        href: href.to_string(),
        extension: ext.to_string(),
    })
}

/// Final extension of the last path segment, if any.
///
/// A leading dot marks a hidden file, not an extension.
pub fn extension(href: &str) -> Option<&str> {
    let name = href.rsplit('/').next().unwrap_or(href);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(dot) if dot + 1 == name.len() => None,
        Some(dot) => Some(&name[dot + 1..]),
    }
}
