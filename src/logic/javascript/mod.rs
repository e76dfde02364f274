//! `javascript`: bundle CommonJS entry points.
//!
//! Each matched path is an entry. Entries are bundled one after another:
//!
//! ```text
//! entry ──load──▶ ModuleGraph ──pack──▶ Packed ──(minify)──▶ Packed
//!                                                             │
//!                    <path> ─ bundle + sourceMappingURL ◀──────┤
//!                <path>.map ─ map (file = bundle href) ◀──────┘
//! ```

mod graph;
mod minify;
mod pack;
mod resolve;

pub use graph::{Module, ModuleGraph};
pub use pack::Packed;

use super::{LocalBoxFuture, StepContext, StepResult, map_json};
use crate::asset::mime::types;
use crate::asset::{Asset, digestify_href};
use crate::bucket::AssetBucket;
use crate::debug;
use crate::error::StepError;

pub fn run<'a>(cx: &'a StepContext<'a>) -> LocalBoxFuture<'a, StepResult> {
    Box::pin(bundle_all(cx))
}

async fn bundle_all(cx: &StepContext<'_>) -> StepResult {
    let mut assets = Vec::with_capacity(cx.paths.len() * 2);
    for path in cx.paths {
        assets.extend(bundle(cx.bucket, path, cx.minify).await?);
    }
    Ok(assets)
}

/// Bundle one entry into its script and map assets.
pub async fn bundle(bucket: &AssetBucket, path: &str, minify: bool) -> StepResult {
    let graph = ModuleGraph::load(bucket.base_path(), &bucket.source_path(path)).await?;
    debug!(
        "bundle";
        "{}: {} module(s){}",
        path,
        graph.len(),
        if minify { ", minified" } else { "" }
    );

    let mut packed = pack::pack(&graph);
    if minify {
        packed = minify::minify(&graph.entry, packed)?;
    }
    finish(bucket, path, packed)
}

fn finish(bucket: &AssetBucket, path: &str, packed: Packed) -> StepResult {
    let href = digestify_href(&bucket.href_for_path(path), packed.code.as_bytes());
    let map_href = format!("{href}.map");

    let mut map = packed.map;
    let map = map_json(&mut map, &href, Some(bucket.base_href()))
        .map_err(|err| StepError::BundlerProtocol(format!("source map for `{path}`: {err:#}")))?;

    let mut code = packed.code;
    code.push_str("\n//# sourceMappingURL=");
    code.push_str(&map_href);

    Ok(vec![
        Asset::new(path, code, href, types::JAVASCRIPT),
        Asset::new(format!("{path}.map"), map, map_href, types::JSON),
    ])
}
