use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;
use tree_sitter::{Node, Parser};

/// Metadata for one function definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    /// Number of declared parameters.
    pub args: usize,
    /// 1-based line of the definition.
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
}

/// Metadata for one class definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
}

/// Structural summary of a single source file.
///
/// On a syntax error the summary degrades to `file` + `line_count` +
/// `error`; the definition lists stay empty. That is a per-file condition,
/// never fatal to a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FileAnalysis {
    pub file: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<ClassInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    pub line_count: usize,
    #[serde(default)]
    pub char_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileAnalysis {
    pub fn has_parse_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Parse `content` and extract functions, classes and imports.
pub fn analyze_source(path: &Path, content: &str) -> FileAnalysis {
    let file = path.display().to_string();
    let line_count = content.lines().count();
    let char_count = content.chars().count();

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::language())
        .expect("python grammar is compiled into the binary");

    let tree = match parser.parse(content, None) {
        Some(tree) => tree,
        None => {
            warn!("parser produced no tree for {file}");
            return FileAnalysis {
                file,
                line_count,
                char_count,
                error: Some("parse failed: no syntax tree produced".to_string()),
                ..Default::default()
            };
        }
    };

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error_line(root).unwrap_or(1);
        return FileAnalysis {
            file,
            line_count,
            char_count,
            error: Some(format!("syntax error near line {line}")),
            ..Default::default()
        };
    }

    let mut analysis = FileAnalysis {
        file,
        line_count,
        char_count,
        ..Default::default()
    };
    walk(root, content, &mut analysis);
    analysis
}

/// Depth-first walk over every node, collecting definitions and imports.
fn walk(node: Node, source: &str, analysis: &mut FileAnalysis) {
    match node.kind() {
        "function_definition" => {
            if let Some(info) = extract_function(node, source) {
                analysis.functions.push(info);
            }
        }
        "class_definition" => {
            if let Some(info) = extract_class(node, source) {
                analysis.classes.push(info);
            }
        }
        "import_statement" => {
            analysis.imports.extend(extract_imports(node, source));
        }
        "import_from_statement" => {
            analysis.imports.extend(extract_from_imports(node, source));
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, source, analysis);
    }
}

fn extract_function(node: Node, source: &str) -> Option<FunctionInfo> {
    let name = field_text(node, "name", source)?;
    let args = node
        .child_by_field_name("parameters")
        .map(|params| params.named_child_count())
        .unwrap_or(0);

    Some(FunctionInfo {
        name,
        args,
        line: node.start_position().row + 1,
        docstring: extract_docstring(node, source),
    })
}

fn extract_class(node: Node, source: &str) -> Option<ClassInfo> {
    let name = field_text(node, "name", source)?;

    Some(ClassInfo {
        name,
        line: node.start_position().row + 1,
        docstring: extract_docstring(node, source),
    })
}

/// `import a.b` / `import a as b` contribute the module name.
fn extract_imports(node: Node, source: &str) -> Vec<String> {
    let mut imports = Vec::new();
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "dotted_name" => imports.extend(node_text(child, source)),
            "aliased_import" => {
                if let Some(module) = field_text(child, "name", source) {
                    imports.push(module);
                }
            }
            _ => {}
        }
    }

    imports
}

/// `from m import a, b` contributes `m.a` and `m.b`; a relative import
/// keeps its leading dot (`from . import x` becomes `.x`).
fn extract_from_imports(node: Node, source: &str) -> Vec<String> {
    let module = node
        .child_by_field_name("module_name")
        .and_then(|m| node_text(m, source))
        .unwrap_or_default();
    let prefix = module.trim_end_matches('.').to_string();

    let mut imports = Vec::new();
    let mut cursor = node.walk();
    for name_node in node.children_by_field_name("name", &mut cursor) {
        let name = match name_node.kind() {
            "aliased_import" => field_text(name_node, "name", source),
            _ => node_text(name_node, source),
        };
        if let Some(name) = name {
            imports.push(format!("{prefix}.{name}"));
        }
    }

    // `from m import *` has a wildcard child outside the name field.
    if imports.is_empty() {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "wildcard_import" {
                imports.push(format!("{prefix}.*"));
            }
        }
    }

    imports
}

/// First string expression of the body block, with quote delimiters removed.
fn extract_docstring(node: Node, source: &str) -> Option<String> {
    let body = node.child_by_field_name("body")?;
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string = first.named_child(0)?;
    if string.kind() != "string" {
        return None;
    }

    let raw = node_text(string, source)?;
    Some(strip_string_delimiters(&raw))
}

fn strip_string_delimiters(raw: &str) -> String {
    let trimmed = raw
        .trim_start_matches(|c| c == 'r' || c == 'b' || c == 'u' || c == 'f');
    for quotes in ["\"\"\"", "'''", "\"", "'"] {
        if trimmed.starts_with(quotes) && trimmed.ends_with(quotes) && trimmed.len() >= 2 * quotes.len() {
            return trimmed[quotes.len()..trimmed.len() - quotes.len()]
                .trim()
                .to_string();
        }
    }
    trimmed.to_string()
}

fn first_error_line(root: Node) -> Option<usize> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.has_error() {
                stack.push(child);
            }
        }
    }
    None
}

fn field_text(node: Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|child| node_text(child, source))
}

fn node_text(node: Node, source: &str) -> Option<String> {
    node.utf8_text(source.as_bytes())
        .ok()
        .map(|text| text.to_string())
}
