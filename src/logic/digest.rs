//! `digest`: publish files under content-addressed hrefs.

use super::{StepContext, StepResult, read_source};
use crate::asset::{Asset, digestify_href};

/// One asset per path, keyed by the path, with the content digest inserted
/// before the href's extension.
pub fn run(cx: &StepContext<'_>) -> StepResult {
    cx.paths
        .iter()
        .map(|path| {
            let data = read_source(cx.bucket, path)?;
            let href = digestify_href(&cx.bucket.href_for_path(path), &data);
            Asset::inferred(path.as_str(), data, href)
        })
        .collect()
}
