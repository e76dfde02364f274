//! Build and step error types.
//!
//! Every failure halts the pipeline at the current step. `BuildError` is the
//! single value a caller sees; it always names the failing step.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::bucket::UnknownKeyError;
use crate::config::ConfigError;

// ============================================================================
// BuildError
// ============================================================================

/// Top-level error of one `render` call.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("step {index} (`{logic}`) failed: {source}")]
    Step {
        index: usize,
        logic: &'static str,
        #[source]
        source: StepError,
    },

    #[error("failed to start the build runtime")]
    Runtime(#[source] io::Error),
}

impl BuildError {
    /// Index of the step that failed, if the failure happened at a step.
    pub fn step_index(&self) -> Option<usize> {
        match self {
            Self::Step { index, .. } => Some(*index),
            Self::Config(err) => err.step_index(),
            Self::Runtime(_) => None,
        }
    }

    /// The step-level error, if any.
    pub fn step_error(&self) -> Option<&StepError> {
        match self {
            Self::Step { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// StepError
// ============================================================================

/// Failure inside one step implementation.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    UnknownKey(#[from] UnknownKeyError),

    #[error("no content type is known for `.{extension}` (in `{href}`)")]
    UnsupportedExtension { href: String, extension: String },

    #[error("expected `{href}` to have a file extension")]
    MissingExtension { href: String },

    #[error("IO error when reading `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    ModuleParse(#[from] ModuleParseError),

    #[error("cannot find module `{specifier}` required from `{module}`")]
    ModuleNotFound { module: String, specifier: String },

    #[error("bundler output is malformed: {0}")]
    BundlerProtocol(String),

    #[error("failed to minify `{entry}`: {message}")]
    Minify { entry: String, message: String },

    #[error("failed to compile style `{path}`: {source:#}")]
    Style {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

impl StepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// ============================================================================
// ModuleParseError
// ============================================================================

/// Syntax error attributed to the module that contains it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({module}:{line}:{column})")]
pub struct ModuleParseError {
    /// Module id relative to the bucket's base path
    pub module: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column (in characters)
    pub column: usize,
    pub message: String,
}
