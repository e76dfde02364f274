//! Dependency graph of one bundle entry.
//!
//! Modules are discovered breadth-first from the entry. Every module is
//! parsed once; its `require("...")` calls with a single string-literal
//! argument become edges. JSON files are loaded as modules exporting their
//! parsed value.

use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

use oxc::allocator::Allocator;
use oxc::ast::ast::{Argument, CallExpression, Expression};
use oxc::ast_visit::{Visit, walk};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::resolve;
use crate::error::{ModuleParseError, StepError};
use crate::utils::path::{normalize_lexical, relative_id};

/// One loaded module.
#[derive(Debug, Clone)]
pub struct Module {
    /// Path relative to the base path, `/`-separated
    pub id: String,
    /// JavaScript source (JSON already wrapped)
    pub source: String,
    /// Specifier -> id of the resolved module
    pub deps: BTreeMap<String, String>,
}

/// Every module reachable from `entry`, keyed by id.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    pub entry: String,
    pub modules: BTreeMap<String, Module>,
}

impl ModuleGraph {
    /// Load `entry` and everything it requires, transitively.
    pub async fn load(base: &Path, entry: &Path) -> Result<Self, StepError> {
        let entry = normalize_lexical(entry);
        let entry_id = relative_id(base, &entry);
        let mut modules = BTreeMap::new();
        let mut queue = VecDeque::from([entry]);

        while let Some(path) = queue.pop_front() {
            let id = relative_id(base, &path);
            if modules.contains_key(&id) {
                continue;
            }

            let source = load_source(&path).await?;
            let mut deps = BTreeMap::new();
            for specifier in scan_requires(&id, &source)? {
                if deps.contains_key(&specifier) {
                    continue;
                }
                let Some(resolved) = resolve::resolve(&path, &specifier).await else {
                    return Err(StepError::ModuleNotFound {
                        module: id,
                        specifier,
                    });
                };
                deps.insert(specifier, relative_id(base, &resolved));
                queue.push_back(resolved);
            }

            modules.insert(id.clone(), Module { id, source, deps });
        }

        Ok(Self {
            entry: entry_id,
            modules,
        })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

async fn load_source(path: &Path) -> Result<String, StepError> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| StepError::io(path, err))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        Ok(format!("module.exports = {};\n", source.trim_end()))
    } else {
        Ok(source)
    }
}

/// Parse `source` and list its `require` specifiers in source order.
fn scan_requires(id: &str, source: &str) -> Result<Vec<String>, ModuleParseError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();

    if let Some(error) = ret.errors.first() {
        let offset = error
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map_or(0, |label| label.offset());
        let (line, column) = line_col(source, offset);
        return Err(ModuleParseError {
            module: id.to_string(),
            line,
            column,
            message: error.message.to_string(),
        });
    }

    let mut collector = RequireCollector::default();
    collector.visit_program(&ret.program);
    Ok(collector.specifiers)
}

/// 1-based line and character column of a byte offset.
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset.min(source.len())).unwrap_or(source);
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line = before.matches('\n').count() + 1;
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[derive(Default)]
struct RequireCollector {
    specifiers: Vec<String>,
}

impl<'a> Visit<'a> for RequireCollector {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Expression::Identifier(callee) = &call.callee
            && callee.name.as_str() == "require"
            && call.arguments.len() == 1
            && let Some(Argument::StringLiteral(literal)) = call.arguments.first()
        {
            self.specifiers.push(literal.value.to_string());
        }
        walk::walk_call_expression(self, call);
    }
}
