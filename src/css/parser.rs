//! CSS Parser using tree-sitter-css
//!
//! Parses CSS text with the tree-sitter-css grammar and converts the concrete
//! syntax tree into the mutable [`Stylesheet`] model. Sources the grammar
//! rejects go through [`parse_tolerant`] instead.

use log::warn;
use tree_sitter::{Node as TsNode, Parser, Tree};

use crate::css::constants::*;
use crate::css::error::{NormalizeError, NormalizeResult};
use crate::css::stylesheet::{AtRule, Comment, Declaration, Node, Rule, Stylesheet};
use crate::css::tolerant_parser::parse_tolerant;

/// CSS parser wrapper around tree-sitter-css
pub struct CssParser {
    parser: Parser,
}

impl CssParser {
    /// Create a new CSS parser
    pub fn new() -> NormalizeResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_css::LANGUAGE.into())
            .map_err(|e| NormalizeError::TreeSitterLanguage {
                message: e.to_string(),
            })?;

        Ok(Self { parser })
    }

    /// Parse CSS content and return the raw syntax tree
    pub fn parse(&mut self, content: &str) -> Option<Tree> {
        self.parser.parse(content, None)
    }

    /// Parse CSS content into a stylesheet model
    pub fn parse_stylesheet(&mut self, content: &str) -> NormalizeResult<Stylesheet> {
        let tree = self.parse(content).ok_or(NormalizeError::NoTree)?;
        let root = tree.root_node();

        if root.has_error() {
            // tree-sitter-css trails modern CSS (range media queries, empty
            // custom properties), so only the block structure is enforced
            let (line, column) = first_error_position(root).unwrap_or((1, 1));
            warn!(
                "tree-sitter-css error at line {}, column {}, using tolerant parser",
                line, column
            );
            return parse_tolerant(content);
        }

        Ok(Stylesheet::new(convert_items(root, content)))
    }
}

/// 1-based position of the first error or missing node, depth first
fn first_error_position(root: TsNode) -> Option<(usize, usize)> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let position = node.start_position();
            return Some((position.row + 1, position.column + 1));
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<TsNode> = node.children(&mut cursor).collect();
            // reversed so the earliest child is examined first
            stack.extend(children.into_iter().rev());
        }
    }
    None
}

/// Convert the items of a container (stylesheet, block, keyframe list)
fn convert_items(container: TsNode, content: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut cursor = container.walk();

    for child in container.children(&mut cursor) {
        let kind = child.kind();
        if kind == NODE_DECLARATION {
            if let Some(declaration) = convert_declaration(child, content) {
                nodes.push(Node::Declaration(declaration));
            }
        } else if kind == NODE_RULE_SET {
            nodes.push(Node::Rule(convert_rule_set(child, content)));
        } else if kind == NODE_KEYFRAME_BLOCK {
            nodes.push(Node::Rule(convert_keyframe_block(child, content)));
        } else if kind == NODE_COMMENT {
            nodes.push(Node::Comment(convert_comment(child, content)));
        } else if AT_RULE_KINDS.contains(&kind) {
            nodes.push(Node::AtRule(convert_at_rule(child, content)));
        }
        // braces and stray semicolons carry nothing
    }

    nodes
}

fn convert_declaration(node: TsNode, content: &str) -> Option<Declaration> {
    let mut prop = None;
    let mut value_start = None;
    let mut value_end = node.end_byte();
    let mut important = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            NODE_PROPERTY_NAME if prop.is_none() => prop = Some(node_text(child, content)),
            NODE_COLON if value_start.is_none() => value_start = Some(child.end_byte()),
            NODE_IMPORTANT => {
                important = true;
                value_end = value_end.min(child.start_byte());
            }
            NODE_SEMICOLON => value_end = value_end.min(child.start_byte()),
            _ => {}
        }
    }

    let prop = prop?;
    let value_start = value_start?;
    let value = content
        .get(value_start..value_end.max(value_start))
        .unwrap_or("")
        .trim()
        .to_string();

    Some(Declaration {
        prop: prop.trim().to_string(),
        value,
        important,
    })
}

fn convert_rule_set(node: TsNode, content: &str) -> Rule {
    let mut selector = String::new();
    let mut nodes = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            NODE_SELECTORS => selector = node_text(child, content).trim().to_string(),
            NODE_BLOCK => nodes = convert_items(child, content),
            _ => {}
        }
    }

    Rule { selector, nodes }
}

/// `from { ... }` / `50% { ... }` inside `@keyframes`
fn convert_keyframe_block(node: TsNode, content: &str) -> Rule {
    let mut cursor = node.walk();
    let block = node.children(&mut cursor).find(|child| child.kind() == NODE_BLOCK);

    match block {
        Some(block) => Rule {
            selector: slice(content, node.start_byte(), block.start_byte()),
            nodes: convert_items(block, content),
        },
        None => Rule {
            selector: node_text(node, content).trim().to_string(),
            nodes: Vec::new(),
        },
    }
}

fn convert_at_rule(node: TsNode, content: &str) -> AtRule {
    let mut cursor = node.walk();
    let children: Vec<TsNode> = node.children(&mut cursor).collect();

    // The first token is the at-keyword, e.g. `@media` or `@layer`
    let (name, prelude_start) = match children.first() {
        Some(keyword) => (
            node_text(*keyword, content)
                .trim()
                .trim_start_matches('@')
                .to_string(),
            keyword.end_byte(),
        ),
        None => (String::new(), node.start_byte()),
    };

    let body = children
        .iter()
        .find(|child| child.kind() == NODE_BLOCK || child.kind() == NODE_KEYFRAME_BLOCK_LIST);

    let prelude_end = match body {
        Some(body) => body.start_byte(),
        None => children
            .iter()
            .rev()
            .find(|child| child.kind() == NODE_SEMICOLON)
            .map(|semicolon| semicolon.start_byte())
            .unwrap_or(node.end_byte()),
    };

    AtRule {
        name,
        params: slice(content, prelude_start, prelude_end),
        nodes: body.map(|body| convert_items(*body, content)),
    }
}

fn convert_comment(node: TsNode, content: &str) -> Comment {
    let text = node_text(node, content);
    let body = text
        .strip_prefix("/*")
        .map(|rest| rest.strip_suffix("*/").unwrap_or(rest))
        .unwrap_or(&text);

    Comment {
        text: body.to_string(),
    }
}

/// Get text content of a node
fn node_text(node: TsNode, content: &str) -> String {
    content[node.start_byte()..node.end_byte()].to_string()
}

/// Trimmed text between two byte offsets
fn slice(content: &str, start: usize, end: usize) -> String {
    content
        .get(start..end.max(start))
        .unwrap_or("")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_creation() {
        let parser = CssParser::new();
        assert!(parser.is_ok());
    }

    #[test]
    fn test_basic_parsing() {
        let mut parser = CssParser::new().unwrap();
        let content = ".my-class { color: red; }";
        let tree = parser.parse(content);
        assert!(tree.is_some());

        let tree = tree.unwrap();
        let root = tree.root_node();
        assert!(!root.has_error());
        assert_eq!(root.kind(), NODE_STYLESHEET);
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn test_simple_rule_conversion() {
        let mut parser = CssParser::new().unwrap();
        let sheet = parser.parse_stylesheet(".my-class { color: red; }").unwrap();

        assert_eq!(
            sheet.nodes,
            vec![Node::Rule(Rule::new(
                ".my-class",
                vec![Node::Declaration(Declaration::new("color", "red"))]
            ))]
        );
    }
}
