//! Pipeline configuration.
//!
//! # Example
//!
//! ```toml
//! host = "https://assets.example.org"  # for fully-qualified URLs
//! base_href = "/my-project"            # prefix of every href
//! base_path = "assets"                 # where inputs are read from
//! minify = true
//!
//! # Steps run in order; each one sees every earlier step's assets.
//! [[assets]]
//! logic = "digest"
//! glob = "images/**/*.{png,jpg,gif,svg,ico}"
//!
//! [[assets]]
//! logic = "javascript"
//! glob = "javascripts/app.js"
//! ```
//!
//! `host`, `base_path` and `assets` are required. Their absence is reported
//! together, before any step runs. Step fields are checked when the step is
//! dispatched.

mod error;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bucket::AssetBucket;
use crate::log;

// ============================================================================
// root configuration
// ============================================================================

/// Top-level build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Used only to build fully-qualified URLs
    pub host: Option<String>,

    /// Prefix for all hrefs (default: empty)
    #[serde(alias = "baseHref")]
    pub base_href: String,

    /// Filesystem root for globs and reads
    #[serde(alias = "basePath")]
    pub base_path: Option<PathBuf>,

    /// Minify JavaScript bundles
    pub minify: bool,

    /// Ordered transformation steps
    pub assets: Option<Vec<StepConfig>>,
}

/// One pipeline step: which files, which logic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    pub glob: Option<String>,
    pub logic: Option<String>,
}

impl StepConfig {
    pub fn new(logic: impl Into<String>, glob: impl Into<String>) -> Self {
        Self {
            glob: Some(glob.into()),
            logic: Some(logic.into()),
        }
    }
}

impl PipelineConfig {
    /// Configuration with the required fields set and no steps.
    pub fn new(host: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            host: Some(host.into()),
            base_href: String::new(),
            base_path: Some(base_path.into()),
            minify: false,
            assets: Some(Vec::new()),
        }
    }

    pub fn with_base_href(mut self, base_href: impl Into<String>) -> Self {
        self.base_href = base_href.into();
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Append a step.
    pub fn with_step(mut self, logic: impl Into<String>, glob: impl Into<String>) -> Self {
        self.assets
            .get_or_insert_with(Vec::new)
            .push(StepConfig::new(logic, glob));
        self
    }

    /// Parse configuration from a TOML string.
    ///
    /// Unknown fields are ignored with a warning.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            log!("warning"; "ignoring unknown config fields: {}", ignored.join(", "));
        }
        Ok(config)
    }

    /// Load configuration from a file.
    ///
    /// A relative `base_path` is resolved against the file's directory.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;

        if let Some(base_path) = &config.base_path
            && base_path.is_relative()
            && let Some(root) = path.parent()
        {
            config.base_path = Some(root.join(base_path));
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check the fields every build needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if self.host.as_deref().is_none_or(str::is_empty) {
            diag.error_with_hint(
                "host",
                "missing `host` option",
                "e.g. host = \"https://assets.example.org\"",
            );
        }
        if self
            .base_path
            .as_deref()
            .is_none_or(|p| p.as_os_str().is_empty())
        {
            diag.error_with_hint(
                "base_path",
                "missing `base_path` option",
                "use \".\" to read inputs from the config directory",
            );
        }
        if self.assets.is_none() {
            diag.error_with_hint(
                "assets",
                "missing `assets`, an array of asset compilation steps",
                "add at least one [[assets]] table with `logic` and `glob`",
            );
        }

        diag.into_result()
    }

    /// Validate and create the empty bucket a build starts from.
    pub fn empty_bucket(&self) -> Result<AssetBucket, ConfigError> {
        self.validate()?;
        Ok(AssetBucket::new(
            self.host.clone().unwrap_or_default(),
            self.base_href.trim_end_matches('/'),
            self.base_path.clone().unwrap_or_default(),
        ))
    }

    /// Configured steps (empty when `assets` is missing).
    pub fn steps(&self) -> &[StepConfig] {
        self.assets.as_deref().unwrap_or_default()
    }
}
