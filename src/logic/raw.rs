//! `raw`: publish files unchanged, under their plain href.

use super::{StepContext, StepResult, read_source};
use crate::asset::Asset;

pub fn run(cx: &StepContext<'_>) -> StepResult {
    cx.paths
        .iter()
        .map(|path| {
            let data = read_source(cx.bucket, path)?;
            Asset::inferred(path.as_str(), data, cx.bucket.href_for_path(path))
        })
        .collect()
}
