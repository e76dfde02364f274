//! `scss`: compile stylesheets through a pluggable compiler.
//!
//! The compiler is a collaborator: it receives the source and callbacks into
//! the current bucket (`asset-url(key)` / `asset-data-url(key)` helpers) and
//! returns CSS plus an optional source map. This module only names, digests
//! and publishes the result.

mod sass;

pub use sass::SassCompiler;

use std::io;
use std::path::Path;

use anyhow::Context;
use parcel_sourcemap::SourceMap;

use super::{StepContext, StepResult, map_json, read_source};
use crate::asset::mime::types;
use crate::asset::{Asset, digestify_href};
use crate::bucket::{AssetBucket, UnknownKeyError};
use crate::error::StepError;

/// Bucket callbacks available to a style compiler.
pub trait AssetLookup {
    fn href_to(&self, key: &str) -> Result<String, UnknownKeyError>;
    fn data_uri_for(&self, key: &str) -> Result<String, UnknownKeyError>;
}

impl AssetLookup for AssetBucket {
    fn href_to(&self, key: &str) -> Result<String, UnknownKeyError> {
        AssetBucket::href_to(self, key).map(str::to_string)
    }

    fn data_uri_for(&self, key: &str) -> Result<String, UnknownKeyError> {
        AssetBucket::data_uri_for(self, key)
    }
}

/// One stylesheet to compile.
#[derive(Debug, Clone, Copy)]
pub struct StyleInput<'a> {
    /// Matched path, relative to the base path
    pub path: &'a str,
    pub source: &'a str,
    pub base_href: &'a str,
    /// Directory `@import`s resolve against
    pub load_path: &'a Path,
}

/// Compiler output.
#[derive(Debug, Clone, Default)]
pub struct CompiledStyle {
    pub css: String,
    /// Source Map v3 JSON
    pub map: Option<String>,
}

/// Stylesheet compiler used by the `scss` step.
pub trait StyleCompiler {
    fn compile(
        &self,
        input: &StyleInput<'_>,
        lookup: &dyn AssetLookup,
    ) -> anyhow::Result<CompiledStyle>;
}

pub fn run(cx: &StepContext<'_>) -> StepResult {
    let mut assets = Vec::with_capacity(cx.paths.len() * 2);
    for path in cx.paths {
        let bytes = read_source(cx.bucket, path)?;
        let file = cx.bucket.source_path(path);
        let source = String::from_utf8(bytes).map_err(|err| {
            StepError::io(&file, io::Error::new(io::ErrorKind::InvalidData, err))
        })?;

        let input = StyleInput {
            path,
            source: &source,
            base_href: cx.bucket.base_href(),
            load_path: file.parent().unwrap_or(cx.bucket.base_path()),
        };
        let compiled = cx
            .style
            .compile(&input, cx.bucket)
            .map_err(|source| StepError::Style {
                path: path.clone(),
                source,
            })?;

        assets.extend(publish(cx.bucket, path, compiled)?);
    }
    Ok(assets)
}

fn publish(bucket: &AssetBucket, path: &str, compiled: CompiledStyle) -> StepResult {
    let key = css_key(path);
    let href = digestify_href(&bucket.href_for_path(&key), compiled.css.as_bytes());

    let Some(map) = compiled.map else {
        return Ok(vec![Asset::new(key, compiled.css, href, types::CSS)]);
    };

    let map_href = format!("{href}.map");
    let map = SourceMap::from_json("/", &map)
        .context("style compiler returned an invalid source map")
        .and_then(|mut map| map_json(&mut map, &href, None))
        .map_err(|source| StepError::Style {
            path: path.to_string(),
            source,
        })?;

    let mut css = compiled.css;
    css.push_str(&format!("\n/*# sourceMappingURL={map_href} */"));

    Ok(vec![
        Asset::new(key.as_str(), css, href, types::CSS),
        Asset::new(format!("{key}.map"), map, map_href, types::JSON),
    ])
}

/// `styles/site.scss` -> `styles/site.css`
fn css_key(path: &str) -> String {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => format!("{}.css", &path[..name_start + dot]),
        _ => format!("{path}.css"),
    }
}
