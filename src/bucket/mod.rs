//! Immutable, queryable collection of build outputs.
//!
//! # Growth
//!
//! ```text
//! empty ──step 0──▶ bucket₁ ──step 1──▶ bucket₂ ── … ──▶ final
//!         (+assets)          (+assets)
//! ```
//!
//! Each step produces a *new* bucket. Configuration is shared through an
//! `Arc`, and the asset sequence and key index are persistent `im`
//! collections, so extending a bucket never copies earlier assets and never
//! touches the bucket earlier steps are still reading from.
//!
//! # Duplicate keys
//!
//! A later asset with an existing key shadows the earlier one in every
//! lookup. Both remain in [`AssetBucket::assets`] and both are published by
//! [`AssetBucket::to_website`].

mod website;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::asset::Asset;

pub use website::{CACHE_CONTROL, Endpoint, Website};

/// Lookup miss, with every valid key for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("asset bucket does not contain key `{key}`. Valid keys are: {}", .valid_keys.join(" "))]
pub struct UnknownKeyError {
    pub key: String,
    /// Sorted
    pub valid_keys: Vec<String>,
}

/// Bucket configuration shared by every bucket of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    host: String,
    base_href: String,
    base_path: PathBuf,
}

/// Immutable snapshot of the assets produced so far.
#[derive(Clone)]
pub struct AssetBucket {
    settings: Arc<Settings>,
    assets: im::Vector<Arc<Asset>>,
    index: im::HashMap<String, Arc<Asset>>,
}

impl AssetBucket {
    /// Create an empty bucket.
    ///
    /// Callers validate `host` and `base_path` beforehand (see
    /// `PipelineConfig::validate`).
    pub fn new(
        host: impl Into<String>,
        base_href: impl Into<String>,
        base_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            settings: Arc::new(Settings {
                host: host.into(),
                base_href: base_href.into(),
                base_path: base_path.into(),
            }),
            assets: im::Vector::new(),
            index: im::HashMap::new(),
        }
    }

    /// Create a bucket holding `assets`, in order.
    pub fn with_assets(
        host: impl Into<String>,
        base_href: impl Into<String>,
        base_path: impl Into<PathBuf>,
        assets: impl IntoIterator<Item = Asset>,
    ) -> Self {
        Self::new(host, base_href, base_path).with_additional_assets(assets)
    }

    pub fn host(&self) -> &str {
        &self.settings.host
    }

    pub fn base_href(&self) -> &str {
        &self.settings.base_href
    }

    pub fn base_path(&self) -> &Path {
        &self.settings.base_path
    }

    /// Assets in insertion order (step order, then per-step order).
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter().map(|a| a.as_ref())
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Whether `key` resolves to an asset.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The asset currently published under `key`.
    pub fn get(&self, key: &str) -> Result<&Asset, UnknownKeyError> {
        self.index
            .get(key)
            .map(|a| a.as_ref())
            .ok_or_else(|| self.unknown_key(key))
    }

    /// Public href of an asset.
    pub fn href_to(&self, key: &str) -> Result<&str, UnknownKeyError> {
        self.get(key).map(|a| a.href.as_str())
    }

    /// Fully-qualified URL of an asset (`host + href`).
    pub fn url_to(&self, key: &str) -> Result<String, UnknownKeyError> {
        let href = self.href_to(key)?;
        Ok(format!("{}{}", self.settings.host, href))
    }

    /// Payload of an asset.
    pub fn data_for(&self, key: &str) -> Result<&[u8], UnknownKeyError> {
        self.get(key).map(|a| a.data.as_slice())
    }

    /// Base64 `data:` URI of an asset.
    pub fn data_uri_for(&self, key: &str) -> Result<String, UnknownKeyError> {
        let asset = self.get(key)?;
        Ok(format!(
            "data:{};base64,{}",
            asset.content_type,
            STANDARD.encode(&asset.data)
        ))
    }

    /// Href of a source path without a digest: `base_href + "/" + path`.
    pub fn href_for_path(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_href, path)
    }

    /// Absolute (or base-relative) filesystem path of a matched path.
    pub fn source_path(&self, path: &str) -> PathBuf {
        self.settings.base_path.join(path)
    }

    /// A new bucket with `assets` appended.
    ///
    /// Shares configuration and every existing asset with `self`. Later
    /// duplicate keys shadow earlier ones in lookups.
    pub fn with_additional_assets(&self, assets: impl IntoIterator<Item = Asset>) -> Self {
        let mut next = self.clone();
        for asset in assets {
            let asset = Arc::new(asset);
            next.index.insert(asset.key.clone(), Arc::clone(&asset));
            next.assets.push_back(asset);
        }
        next
    }

    /// Publishable records, one per asset, in insertion order.
    pub fn to_website(&self) -> Website<'_> {
        Website::new(self.assets().map(Endpoint::from_asset).collect())
    }

    fn unknown_key(&self, key: &str) -> UnknownKeyError {
        let mut valid_keys: Vec<String> = self.index.keys().cloned().collect();
        valid_keys.sort();
        UnknownKeyError {
            key: key.to_string(),
            valid_keys,
        }
    }
}

impl fmt::Debug for AssetBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetBucket")
            .field("host", &self.settings.host)
            .field("base_href", &self.settings.base_href)
            .field("base_path", &self.settings.base_path)
            .field("assets", &self.assets)
            .finish()
    }
}

#[cfg(test)]
mod tests;
