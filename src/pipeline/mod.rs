//! Build executor.
//!
//! Runs the configured steps strictly in order, each one against the bucket
//! produced by all earlier steps.
//!
//! ```text
//! config ──validate──▶ empty bucket
//!                          │
//!          ┌───────────────┘
//!          ▼
//!   step i: glob ──▶ paths ──▶ logic(bucket_i, paths) ──▶ assets
//!          │                                                 │
//!          └──────────── bucket_i+1 = bucket_i + assets ◀────┘
//! ```
//!
//! The first failure ends the build; no later step starts. There are no
//! background workers: suspending logics are awaited in place, and the
//! blocking entry point drives everything on one thread.

pub mod glob;

use crate::bucket::AssetBucket;
use crate::config::{ConfigError, PipelineConfig};
use crate::error::BuildError;
use crate::logic::{SassCompiler, StepContext, StepKind, StyleCompiler};
use crate::{debug, log};

/// A configured build, ready to render.
pub struct Pipeline {
    config: PipelineConfig,
    style: Box<dyn StyleCompiler>,
    summary: bool,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            style: Box::new(SassCompiler::default()),
            summary: false,
        }
    }

    /// Use `style` for `scss` steps instead of the grass + lightningcss default.
    pub fn with_style_compiler(mut self, style: impl StyleCompiler + 'static) -> Self {
        self.style = Box::new(style);
        self
    }

    /// Print one line per finished build.
    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every step and return the final bucket.
    pub async fn render(&self) -> Result<AssetBucket, BuildError> {
        let mut bucket = self.config.empty_bucket()?;

        for (index, step) in self.config.steps().iter().enumerate() {
            let Some(pattern) = step.glob.as_deref() else {
                return Err(ConfigError::MissingGlob { step: index }.into());
            };
            let name = step.logic.as_deref().unwrap_or_default();
            let Some(kind) = StepKind::from_name(name) else {
                return Err(ConfigError::UnknownLogic {
                    step: index,
                    name: name.to_string(),
                    valid: StepKind::valid_names().join(", "),
                }
                .into());
            };

            let paths = glob::resolve(bucket.base_path(), pattern).map_err(|message| {
                ConfigError::InvalidGlob {
                    step: index,
                    pattern: pattern.to_string(),
                    message,
                }
            })?;
            debug!("pipeline"; "step {} `{}`: {} path(s) match `{}`", index, kind, paths.len(), pattern);

            let cx = StepContext {
                index,
                bucket: &bucket,
                paths: &paths,
                minify: self.config.minify,
                style: self.style.as_ref(),
            };
            let assets = kind
                .transform()
                .run(&cx)
                .await
                .map_err(|source| BuildError::Step {
                    index,
                    logic: kind.name(),
                    source,
                })?;

            debug!("pipeline"; "step {} `{}`: {} asset(s)", index, kind, assets.len());
            bucket = bucket.with_additional_assets(assets);
        }

        if self.summary {
            log!(
                "pipeline";
                "{} asset(s) from {} step(s)",
                bucket.len(),
                self.config.steps().len()
            );
        }
        Ok(bucket)
    }

    /// [`render`](Self::render) on a single-threaded runtime.
    pub fn render_blocking(&self) -> Result<AssetBucket, BuildError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(BuildError::Runtime)?;
        rt.block_on(self.render())
    }
}
