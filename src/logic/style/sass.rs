//! Default style compiler: grass for Sass, lightningcss for the rest.
//!
//! ```text
//! source ──helpers──▶ SCSS ──grass──▶ CSS ──lightningcss──▶ minified, prefixed CSS + map
//! ```
//!
//! The map points into the CSS grass produced; grass itself emits no map.

use std::fmt;
use std::sync::LazyLock;

use anyhow::anyhow;
use lightningcss::error::Error as CssError;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use regex::Regex;

use super::{AssetLookup, CompiledStyle, StyleCompiler, StyleInput};

/// `asset-url(key)` and `asset-data-url(key)`, key optionally quoted.
static HELPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"asset-(data-)?url\([ \t\r\n]*(?:"([^"]*)"|'([^']*)'|([^) \t\r\n"']+))[ \t\r\n]*\)"#)
        .unwrap()
});

/// Browser versions are encoded as `major << 16 | minor << 8 | patch`.
const fn version(major: u32) -> Option<u32> {
    Some(major << 16)
}

/// Sass-compiling [`StyleCompiler`].
#[derive(Debug, Clone, Copy)]
pub struct SassCompiler {
    browsers: Browsers,
}

impl Default for SassCompiler {
    fn default() -> Self {
        Self {
            browsers: Browsers {
                ie: version(10),
                safari: version(8),
                chrome: version(44),
                firefox: version(43),
                ..Browsers::default()
            },
        }
    }
}

impl SassCompiler {
    pub fn with_browsers(browsers: Browsers) -> Self {
        Self { browsers }
    }

    fn targets(&self) -> Targets {
        Targets::from(self.browsers)
    }
}

impl StyleCompiler for SassCompiler {
    fn compile(
        &self,
        input: &StyleInput<'_>,
        lookup: &dyn AssetLookup,
    ) -> anyhow::Result<CompiledStyle> {
        let source = expand_helpers(input.source, lookup)?;

        let options = grass::Options::default().load_path(input.load_path);
        let css = grass::from_string(source, &options).map_err(|err| anyhow!("{err}"))?;
        // Partials are not pre-expanded; quoted helpers in them pass through grass.
        let css = expand_helpers(&css, lookup)?;

        let options = ParserOptions {
            filename: input.path.to_string(),
            ..ParserOptions::default()
        };
        let mut stylesheet = StyleSheet::parse(&css, options).map_err(located)?;
        stylesheet
            .minify(MinifyOptions {
                targets: self.targets(),
                ..MinifyOptions::default()
            })
            .map_err(located)?;

        let mut map = parcel_sourcemap::SourceMap::new("/");
        let id = map.add_source(input.path);
        map.set_source_content(id as usize, &css)?;

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                source_map: Some(&mut map),
                targets: self.targets(),
                ..PrinterOptions::default()
            })
            .map_err(located)?;

        Ok(CompiledStyle {
            css: result.code,
            map: Some(map.to_json(None)?),
        })
    }
}

/// lightningcss counts lines from 0; report them from 1.
fn located<T: fmt::Display>(err: CssError<T>) -> anyhow::Error {
    match err.loc {
        Some(loc) => anyhow!(
            "{} ({}:{}:{})",
            err.kind,
            loc.filename,
            loc.line + 1,
            loc.column
        ),
        None => anyhow!("{}", err.kind),
    }
}

/// Replace helper calls with `url("...")` pointing into the bucket.
fn expand_helpers(source: &str, lookup: &dyn AssetLookup) -> anyhow::Result<String> {
    let mut out = String::with_capacity(source.len());
    let mut last = 0;

    for caps in HELPER.captures_iter(source) {
        let Some(call) = caps.get(0) else {
            continue;
        };
        let key = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        let target = if caps.get(1).is_some() {
            lookup.data_uri_for(key)?
        } else {
            lookup.href_to(key)?
        };

        out.push_str(&source[last..call.start()]);
        out.push_str("url(\"");
        out.push_str(&target);
        out.push_str("\")");
        last = call.end();
    }

    out.push_str(&source[last..]);
    Ok(out)
}
