//! Definition lookup
//!
//! One locator per grammar that can be parsed structurally. Grammars
//! without a locator answer `Lookup::Unsupported`, which is an ordinary
//! outcome and not an error.

use std::collections::HashMap;

use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::core::error::DefinitionError;

/// Zero-based position of a definition's name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found(Location),
    NotFound,
    Unsupported,
}

pub trait DefinitionLocator {
    /// Find a top-level definition called `name` in `source`
    fn find_top_level_definition(&self, source: &str, name: &str) -> Result<Lookup, DefinitionError>;
}

// ===== PYTHON =====

/// Finds top-level `def`/`class` statements with tree-sitter
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonLocator;

impl DefinitionLocator for PythonLocator {
    fn find_top_level_definition(&self, source: &str, name: &str) -> Result<Lookup, DefinitionError> {
        let mut parser = Parser::new();
        parser
            .set_language(tree_sitter_python::language())
            .map_err(|e| DefinitionError::Backend(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| DefinitionError::Backend("parse was cancelled".to_string()))?;
        let root = tree.root_node();

        if root.has_error() {
            let row = first_error(root).map_or(0, |node| node.start_position().row);
            debug!(row, "source does not parse");
            return Err(DefinitionError::Parse { line: row + 1 });
        }

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            let definition = match child.kind() {
                "function_definition" | "class_definition" => child,
                "decorated_definition" => match child.child_by_field_name("definition") {
                    Some(inner) => inner,
                    None => continue,
                },
                _ => continue,
            };
            let Some(name_node) = definition.child_by_field_name("name") else {
                continue;
            };
            if name_node.utf8_text(source.as_bytes()).ok() != Some(name) {
                continue;
            }
            let point = name_node.start_position();
            let line_text = source.lines().nth(point.row).unwrap_or_default();
            let column = line_text
                .get(..point.column)
                .map_or(point.column, |prefix| prefix.chars().count());
            return Ok(Lookup::Found(Location {
                line: point.row,
                column,
            }));
        }
        Ok(Lookup::NotFound)
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

// ===== REGISTRY =====

/// Locators keyed by grammar name
#[derive(Default)]
pub struct DefinitionLocators {
    by_grammar: HashMap<String, Box<dyn DefinitionLocator>>,
}

impl DefinitionLocators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut locators = Self::new();
        locators.register("python", Box::new(PythonLocator));
        locators
    }

    pub fn register(&mut self, grammar: &str, locator: Box<dyn DefinitionLocator>) {
        self.by_grammar.insert(grammar.to_string(), locator);
    }

    pub fn lookup(&self, grammar: &str, source: &str, name: &str) -> Result<Lookup, DefinitionError> {
        match self.by_grammar.get(grammar) {
            Some(locator) => locator.find_top_level_definition(source, name),
            None => Ok(Lookup::Unsupported),
        }
    }
}

impl std::fmt::Debug for DefinitionLocators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.by_grammar.keys().collect();
        names.sort();
        f.debug_struct("DefinitionLocators")
            .field("grammars", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_function_name_column() {
        let source = "def f():\n    x = 1\n    return x";
        let found = PythonLocator.find_top_level_definition(source, "f").unwrap();
        assert_eq!(found, Lookup::Found(Location { line: 0, column: 4 }));
    }

    #[test]
    fn test_finds_class_and_decorated_function() {
        let source = "import os\n\nclass Node:\n    pass\n\n@cache\ndef build(a):\n    return a\n";
        assert_eq!(
            PythonLocator.find_top_level_definition(source, "Node").unwrap(),
            Lookup::Found(Location { line: 2, column: 6 })
        );
        assert_eq!(
            PythonLocator.find_top_level_definition(source, "build").unwrap(),
            Lookup::Found(Location { line: 6, column: 4 })
        );
    }

    #[test]
    fn test_nested_definitions_are_not_top_level() {
        let source = "class A:\n    def inner(self):\n        pass\n";
        assert_eq!(
            PythonLocator.find_top_level_definition(source, "inner").unwrap(),
            Lookup::NotFound
        );
    }

    #[test]
    fn test_parse_failure_is_located() {
        let source = "x = 1\ndef broken(:\n    pass\n";
        let err = PythonLocator
            .find_top_level_definition(source, "broken")
            .unwrap_err();
        assert!(matches!(err, DefinitionError::Parse { line } if line >= 1));
    }

    #[test]
    fn test_unregistered_grammar_is_unsupported() {
        let locators = DefinitionLocators::builtin();
        assert_eq!(
            locators.lookup("tcl", "proc f {} {}", "f").unwrap(),
            Lookup::Unsupported
        );
    }
}
