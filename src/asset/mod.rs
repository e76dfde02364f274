//! Build outputs: the immutable `Asset` value and its naming helpers.

pub mod digest;
pub mod mime;

use std::fmt;

use crate::error::StepError;

pub use digest::digestify_href;

/// One immutable build output.
///
/// Created once by a step while processing a matched path, then owned by the
/// `AssetBucket` that holds it.
#[derive(Clone, PartialEq, Eq)]
pub struct Asset {
    /// Logical identifier used for cross-references within a build
    pub key: String,
    /// Raw payload bytes
    pub data: Vec<u8>,
    /// Public path, content-addressed for digested assets
    pub href: String,
    /// MIME type sent as `Content-Type`
    pub content_type: String,
}

impl Asset {
    pub fn new(
        key: impl Into<String>,
        data: impl Into<Vec<u8>>,
        href: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            data: data.into(),
            href: href.into(),
            content_type: content_type.into(),
        }
    }

    /// Create an asset whose content type is inferred from the href's extension.
    pub fn inferred(
        key: impl Into<String>,
        data: impl Into<Vec<u8>>,
        href: impl Into<String>,
    ) -> Result<Self, StepError> {
        let href = href.into();
        let content_type = mime::from_href(&href)?;
        Ok(Self::new(key, data, href, content_type))
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("key", &self.key)
            .field("href", &self.href)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inferred_content_type() {
        let asset = Asset::inferred("logo.png", b"png".to_vec(), "/b/logo-12345678.png").unwrap();
        assert_eq!(asset.key, "logo.png");
        assert_eq!(asset.content_type, "image/png");
    }

    #[test]
    fn test_inferred_rejects_unknown_extension() {
        let err = Asset::inferred("notes.md", Vec::new(), "/notes.md").unwrap_err();
        assert!(matches!(err, StepError::UnsupportedExtension { .. }));
    }

    #[test]
    fn test_debug_omits_payload() {
        let asset = Asset::new("a", vec![0u8; 1024], "/a", "application/test");
        let debug = format!("{asset:?}");
        assert!(debug.contains("len: 1024"));
        assert!(!debug.contains("0, 0, 0"));
    }
}
