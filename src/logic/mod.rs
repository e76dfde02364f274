//! Step logics.
//!
//! Every step names one of a closed set of logics. A logic is either
//! blocking (plain function) or suspending (returns a future); the executor
//! awaits both the same way.
//!
//! | name         | kind       | output per matched path            |
//! |--------------|------------|------------------------------------|
//! | `digest`     | blocking   | file, digest in href               |
//! | `javascript` | suspending | bundle + `.map`                    |
//! | `raw`        | blocking   | file, href kept as-is              |
//! | `scss`       | blocking   | `.css` + `.css.map`                |

pub mod digest;
pub mod javascript;
pub mod raw;
pub mod style;

use std::fmt;
use std::pin::Pin;

use parcel_sourcemap::SourceMap;
use serde_json::Value;

use crate::asset::Asset;
use crate::bucket::AssetBucket;
use crate::error::StepError;

pub use style::{AssetLookup, CompiledStyle, SassCompiler, StyleCompiler, StyleInput};

/// Result of one step invocation.
pub type StepResult = Result<Vec<Asset>, StepError>;

/// Boxed future tied to the step's borrows. Not `Send`: steps run on the
/// executor's thread.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

pub type BlockingFn = fn(&StepContext<'_>) -> StepResult;
pub type SuspendingFn = for<'a> fn(&'a StepContext<'a>) -> LocalBoxFuture<'a, StepResult>;

/// Everything a step invocation can see.
pub struct StepContext<'a> {
    /// Position of the step in the configuration
    pub index: usize,
    /// Bucket produced by all earlier steps
    pub bucket: &'a AssetBucket,
    /// Paths matched by the step's glob, relative to the base path
    pub paths: &'a [String],
    pub minify: bool,
    pub style: &'a dyn StyleCompiler,
}

/// How a logic produces its assets.
#[derive(Clone, Copy)]
pub enum Transform {
    Blocking(BlockingFn),
    Suspending(SuspendingFn),
}

impl Transform {
    /// Run the transform; blocking ones complete before the first poll.
    pub async fn run(self, cx: &StepContext<'_>) -> StepResult {
        match self {
            Self::Blocking(f) => f(cx),
            Self::Suspending(f) => f(cx).await,
        }
    }

    pub fn is_suspending(self) -> bool {
        matches!(self, Self::Suspending(_))
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Blocking(_) => "Blocking",
            Self::Suspending(_) => "Suspending",
        })
    }
}

/// Registered logic names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Digest,
    Javascript,
    Raw,
    Scss,
}

impl StepKind {
    /// All logics, sorted by name.
    pub const ALL: [Self; 4] = [Self::Digest, Self::Javascript, Self::Raw, Self::Scss];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Digest => "digest",
            Self::Javascript => "javascript",
            Self::Raw => "raw",
            Self::Scss => "scss",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Sorted names, for error messages.
    pub fn valid_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.name()).collect()
    }

    pub fn transform(self) -> Transform {
        match self {
            Self::Digest => Transform::Blocking(digest::run),
            Self::Javascript => Transform::Suspending(javascript::run),
            Self::Raw => Transform::Blocking(raw::run),
            Self::Scss => Transform::Blocking(style::run),
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read one matched path from the bucket's base path.
pub(crate) fn read_source(bucket: &AssetBucket, path: &str) -> Result<Vec<u8>, StepError> {
    let file = bucket.source_path(path);
    std::fs::read(&file).map_err(|err| StepError::io(file, err))
}

/// Serialize `map` as Source Map v3 JSON naming `file` as its output.
/// A missing `source_root` leaves the field out.
pub(crate) fn map_json(
    map: &mut SourceMap,
    file: &str,
    source_root: Option<&str>,
) -> anyhow::Result<String> {
    let mut json: Value = serde_json::from_str(&map.to_json(source_root)?)?;
    if let Some(fields) = json.as_object_mut() {
        if fields.get("sourceRoot").is_some_and(Value::is_null) {
            fields.remove("sourceRoot");
        }
        fields.insert("file".to_string(), Value::from(file));
    }
    Ok(json.to_string())
}
