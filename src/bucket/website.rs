//! Publishable `{path, headers, body}` records.
//!
//! Serving or uploading the records is left to the caller.

use crate::asset::Asset;

/// Year-long caching. Safe for digested hrefs; raw assets inherit it too, so
/// frequently-changing files should not be published raw.
pub const CACHE_CONTROL: &str = "public; max-age=31536000";

/// One static endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint<'a> {
    pub path: &'a str,
    /// `Content-Type` then `Cache-Control`
    pub headers: [(&'static str, &'a str); 2],
    pub body: &'a [u8],
}

impl<'a> Endpoint<'a> {
    pub fn from_asset(asset: &'a Asset) -> Self {
        Self {
            path: asset.href.as_str(),
            headers: [
                ("Content-Type", asset.content_type.as_str()),
                ("Cache-Control", CACHE_CONTROL),
            ],
            body: asset.data.as_slice(),
        }
    }

    /// Header value by (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}

/// Ordered set of endpoints borrowed from a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Website<'a> {
    pub endpoints: Vec<Endpoint<'a>>,
}

impl<'a> Website<'a> {
    pub fn new(endpoints: Vec<Endpoint<'a>>) -> Self {
        Self { endpoints }
    }

    /// Endpoint served at `path`. The last one wins if paths repeat.
    pub fn get(&self, path: &str) -> Option<&Endpoint<'a>> {
        self.endpoints.iter().rev().find(|e| e.path == path)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
