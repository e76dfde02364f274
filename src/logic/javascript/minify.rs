//! Bundle minification with oxc.
//!
//! The minifier's own map describes minified -> packed positions. Extending
//! it with the pack map makes the result point at module sources.

use std::path::PathBuf;

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use parcel_sourcemap::{SourceMap, SourceMapError};

use super::pack::Packed;
use crate::error::StepError;

/// Minify a packed bundle, keeping its map accurate.
pub fn minify(entry: &str, packed: Packed) -> Result<Packed, StepError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, &packed.code, SourceType::cjs()).parse();
    if let Some(error) = ret.errors.first() {
        return Err(StepError::Minify {
            entry: entry.to_string(),
            message: error.to_string(),
        });
    }

    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::default()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let output = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            source_map_path: Some(PathBuf::from(entry)),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program);

    let Some(raw_map) = output.map else {
        return Err(StepError::BundlerProtocol(format!(
            "minifier returned no source map for `{entry}`"
        )));
    };
    let protocol =
        |err: SourceMapError| StepError::BundlerProtocol(format!("minifier source map: {err}"));
    let mut map = SourceMap::from_json("/", &raw_map.to_json_string()).map_err(protocol)?;
    let mut inner = packed.map;
    map.extends(&mut inner).map_err(protocol)?;

    Ok(Packed {
        code: output.code,
        map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::javascript::graph::{Module, ModuleGraph};
    use crate::logic::javascript::pack::pack;
    use std::collections::BTreeMap;

    fn single(code: &str) -> Packed {
        let mut modules = BTreeMap::new();
        modules.insert(
            "app.js".to_string(),
            Module {
                id: "app.js".into(),
                source: code.into(),
                deps: BTreeMap::new(),
            },
        );
        pack(&ModuleGraph {
            entry: "app.js".into(),
            modules,
        })
    }

    #[test]
    fn test_minify_shrinks() {
        let code = "function greet(longParameterName) {\n  return 'hello ' + longParameterName;\n}\nconsole.log(greet('foobar'));\n";
        let plain = single(code);
        let plain_len = plain.code.len();
        let result = minify("app.js", plain).unwrap();

        assert!(result.code.len() < plain_len);
        assert!(result.code.contains("foobar"));
        assert!(result.map.get_sources().iter().any(|s| s == "app.js"));
        assert!(!result.map.get_mappings().is_empty());
    }

    #[test]
    fn test_minified_literal_maps_to_its_module() {
        let mut modules = BTreeMap::new();
        modules.insert(
            "js/app.js".to_string(),
            Module {
                id: "js/app.js".into(),
                source: "var dep = require('./dep');\nconsole.log(dep);\n".into(),
                deps: BTreeMap::from([("./dep".to_string(), "js/dep.js".to_string())]),
            },
        );
        modules.insert(
            "js/dep.js".to_string(),
            Module {
                id: "js/dep.js".into(),
                source: "module.exports = 'foobar';\n".into(),
                deps: BTreeMap::new(),
            },
        );
        let graph = ModuleGraph {
            entry: "js/app.js".into(),
            modules,
        };
        let mut result = minify("js/app.js", pack(&graph)).unwrap();

        let (line, text) = result
            .code
            .lines()
            .enumerate()
            .find(|(_, text)| text.contains("foobar"))
            .unwrap();
        // Opening quote of the literal.
        let column = text.find("foobar").unwrap() as u32 - 1;

        let found = result.map.find_closest_mapping(line as u32, column).unwrap();
        assert_eq!(found.generated_column, column);
        let original = found.original.unwrap();
        assert_eq!(result.map.get_source(original.source).unwrap(), "js/dep.js");
        assert_eq!(original.original_line, 0);
        assert_eq!(original.original_column, 17);
    }

    #[test]
    fn test_minify_rejects_invalid_code() {
        let packed = Packed {
            code: "var = ;\n".into(),
            map: SourceMap::new("/"),
        };
        let err = minify("app.js", packed).unwrap_err();
        assert!(matches!(err, StepError::Minify { .. }));
    }
}
