//! asset-bucket - a build pipeline for static web assets.
//!
//! A build is a list of steps. Each step globs input files under a base path
//! and hands them to a logic (`digest`, `raw`, `javascript`, `scss`) that
//! turns them into [`Asset`]s. Every step sees the assets of all earlier
//! steps through an immutable [`AssetBucket`], so a stylesheet can point at a
//! digested image and a bundle's source map can point at its bundle.
//!
//! ```no_run
//! use asset_bucket::{PipelineConfig, Pipeline};
//!
//! let config = PipelineConfig::new("https://assets.example.org", "assets")
//!     .with_base_href("/my-project")
//!     .with_step("digest", "images/**/*.{png,svg}")
//!     .with_step("javascript", "javascripts/app.js")
//!     .with_step("scss", "stylesheets/site.scss");
//!
//! let bucket = Pipeline::new(config).render_blocking()?;
//! println!("{}", bucket.href_to("javascripts/app.js")?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod asset;
pub mod bucket;
pub mod config;
pub mod error;
pub mod logger;
pub mod logic;
pub mod pipeline;
pub mod utils;

pub use asset::Asset;
pub use bucket::{AssetBucket, Endpoint, UnknownKeyError, Website};
pub use config::{ConfigError, PipelineConfig, StepConfig};
pub use error::{BuildError, ModuleParseError, StepError};
pub use logic::{AssetLookup, CompiledStyle, SassCompiler, StepKind, StyleCompiler, StyleInput};
pub use pipeline::Pipeline;

/// Render `config` with the default style compiler.
pub async fn render(config: &PipelineConfig) -> Result<AssetBucket, BuildError> {
    Pipeline::new(config.clone()).render().await
}
