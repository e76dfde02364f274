//! Concatenate a module graph into one self-executing script.
//!
//! ```text
//! (function (modules, entry) { ...loader... })({
//! "js/app.js": [function (require, module, exports) {
//! <source of js/app.js>
//! }, {"./dep":"js/dep.js"}],
//! ...
//! }, "js/app.js");
//! ```
//!
//! Module sources are copied line for line at column 0, so every token keeps
//! its column. The map has one segment per token start.

use parcel_sourcemap::{OriginalLocation, SourceMap};
use serde_json::json;

use super::graph::ModuleGraph;

const PRELUDE: &str = r#"(function (modules, entry) {
  var cache = {};
  function load(id) {
    if (cache[id]) return cache[id].exports;
    var definition = modules[id];
    if (!definition) {
      var err = new Error("Cannot find module '" + id + "'");
      err.code = "MODULE_NOT_FOUND";
      throw err;
    }
    var module = cache[id] = { exports: {} };
    definition[0].call(module.exports, function (name) {
      return load(definition[1][name] || name);
    }, module, module.exports);
    return module.exports;
  }
  return load(entry);
})({
"#;

/// Bundled code and its map back to the module sources.
#[derive(Debug, Clone)]
pub struct Packed {
    pub code: String,
    pub map: SourceMap,
}

/// Code buffer that tracks the current 0-based line.
struct Writer {
    code: String,
    line: u32,
}

impl Writer {
    fn push(&mut self, text: &str) {
        self.line += text.matches('\n').count() as u32;
        self.code.push_str(text);
    }
}

pub fn pack(graph: &ModuleGraph) -> Packed {
    let mut out = Writer {
        code: String::new(),
        line: 0,
    };
    let mut map = SourceMap::new("/");
    out.push(PRELUDE);

    let last = graph.modules.len().saturating_sub(1);
    for (i, module) in graph.modules.values().enumerate() {
        out.push(&format!(
            "{}: [function (require, module, exports) {{\n",
            json!(module.id)
        ));

        let source = map.add_source(&module.id);
        // In range: `source` was just added.
        let _ = map.set_source_content(source as usize, &module.source);
        let start = out.line;
        for (n, line) in module.source.lines().enumerate() {
            for column in token_starts(line) {
                let original = OriginalLocation::new(n as u32, column, source, None);
                map.add_mapping(start + n as u32, column, Some(original));
            }
        }

        out.push(&module.source);
        if !module.source.ends_with('\n') {
            out.push("\n");
        }
        out.push(&format!("}}, {}]", json!(module.deps)));
        out.push(if i == last { "\n" } else { ",\n" });
    }

    out.push(&format!("}}, {});\n", json!(graph.entry)));

    Packed {
        code: out.code,
        map,
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// UTF-16 columns where a token may start: column 0, then every
/// punctuation character and the first character of every word.
fn token_starts(line: &str) -> Vec<u32> {
    let mut starts = vec![0];
    let mut column = 0;
    let mut prev: Option<char> = None;
    for c in line.chars() {
        let starts_token = !c.is_whitespace() && (!is_word(c) || !prev.is_some_and(is_word));
        if starts_token && column > 0 {
            starts.push(column);
        }
        column += c.len_utf16() as u32;
        prev = Some(c);
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::javascript::graph::Module;
    use std::collections::BTreeMap;

    fn graph() -> ModuleGraph {
        let mut modules = BTreeMap::new();
        modules.insert(
            "js/app.js".to_string(),
            Module {
                id: "js/app.js".into(),
                source: "var dep = require('./dep');\nconsole.log(dep);".into(),
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
        ModuleGraph {
            entry: "js/app.js".into(),
            modules,
        }
    }

    #[test]
    fn test_layout() {
        let packed = pack(&graph());
        assert!(packed.code.starts_with("(function (modules, entry) {"));
        assert!(packed.code.contains("\"js/dep.js\": [function (require, module, exports) {\n"));
        assert!(packed.code.contains("}, {\"./dep\":\"js/dep.js\"}],\n"));
        assert!(packed.code.ends_with("}, \"js/app.js\");\n"));
    }

    #[test]
    fn test_token_starts() {
        assert_eq!(token_starts("module.exports = 'foobar';"), vec![0, 6, 7, 15, 17, 18, 24, 25]);
        assert_eq!(token_starts("  x"), vec![0, 2]);
        assert_eq!(token_starts(""), vec![0]);
    }

    #[test]
    fn test_map_points_at_module_tokens() {
        let packed = pack(&graph());
        let lines: Vec<&str> = packed.code.lines().collect();
        assert_eq!(packed.map.get_sources(), &["js/app.js", "js/dep.js"]);
        assert_eq!(
            packed.map.get_source_content(1).unwrap(),
            "module.exports = 'foobar';\n"
        );

        let mut mapped_lines = Vec::new();
        for mapping in packed.map.get_mappings() {
            let original = mapping.original.unwrap();
            let content = packed.map.get_source_content(original.source).unwrap();
            let expected = content.lines().nth(original.original_line as usize).unwrap();
            let generated = lines[mapping.generated_line as usize];
            assert_eq!(generated, expected);
            assert_eq!(mapping.generated_column, original.original_column);
            if !mapped_lines.contains(&mapping.generated_line) {
                mapped_lines.push(mapping.generated_line);
            }
        }
        assert_eq!(mapped_lines.len(), 3);
    }

    #[test]
    fn test_literal_keeps_its_column() {
        let mut packed = pack(&graph());
        let (line, text) = packed
            .code
            .lines()
            .enumerate()
            .find(|(_, text)| text.contains("'foobar'"))
            .unwrap();
        let column = text.find("'foobar'").unwrap() as u32;

        let found = packed.map.find_closest_mapping(line as u32, column).unwrap();
        let original = found.original.unwrap();
        assert_eq!(packed.map.get_source(original.source).unwrap(), "js/dep.js");
        assert_eq!((original.original_line, original.original_column), (0, 17));
    }

    /// Walk the loader call `(function (modules, entry) {...})({...}, "entry")`
    /// and check that everything the loader can look up exists.
    #[test]
    fn test_every_lookup_resolves() {
        use oxc::allocator::Allocator;
        use oxc::ast::ast::{
            Argument, ArrayExpressionElement, Expression, ObjectPropertyKind, PropertyKey,
            Statement,
        };
        use oxc::parser::Parser;
        use oxc::span::SourceType;

        let packed = pack(&graph());
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, &packed.code, SourceType::cjs()).parse();
        assert!(ret.errors.is_empty());

        let [Statement::ExpressionStatement(stmt)] = ret.program.body.as_slice() else {
            panic!("expected a single expression statement");
        };
        let Expression::CallExpression(call) = &stmt.expression else {
            panic!("expected the loader call");
        };
        let [Argument::ObjectExpression(modules), Argument::StringLiteral(entry)] =
            call.arguments.as_slice()
        else {
            panic!("expected (modules, entry) arguments");
        };

        let mut ids = Vec::new();
        let mut deps = Vec::new();
        for property in &modules.properties {
            let ObjectPropertyKind::ObjectProperty(property) = property else {
                panic!("unexpected spread in modules");
            };
            let PropertyKey::StringLiteral(id) = &property.key else {
                panic!("module ids are string keys");
            };
            ids.push(id.value.to_string());

            let Expression::ArrayExpression(definition) = &property.value else {
                panic!("`{}` is not a [factory, deps] pair", id.value);
            };
            let [
                ArrayExpressionElement::FunctionExpression(factory),
                ArrayExpressionElement::ObjectExpression(map),
            ] = definition.elements.as_slice()
            else {
                panic!("`{}` is not a [factory, deps] pair", id.value);
            };
            assert_eq!(factory.params.items.len(), 3);

            for dep in &map.properties {
                let ObjectPropertyKind::ObjectProperty(dep) = dep else {
                    panic!("unexpected spread in deps");
                };
                let Expression::StringLiteral(target) = &dep.value else {
                    panic!("dependency targets are string ids");
                };
                deps.push(target.value.to_string());
            }
        }

        assert_eq!(ids, ["js/app.js", "js/dep.js"]);
        assert!(ids.contains(&entry.value.to_string()));
        assert_eq!(deps, ["js/dep.js"]);
        for dep in &deps {
            assert!(ids.contains(dep), "`{dep}` has no factory");
        }
    }
}
