//! Mutable stylesheet model
//!
//! The tree-sitter syntax tree is read-only, so the parser converts it into
//! this owned tree. Transforms mutate it in place and the printer writes it
//! back out as CSS text.

use crate::css::constants::CUSTOM_PROPERTY_PREFIX;

/// Root of a parsed stylesheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
}

/// A node in the stylesheet tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    AtRule(AtRule),
    Rule(Rule),
    Declaration(Declaration),
    Comment(Comment),
}

/// An at-rule such as `@layer base { ... }` or `@import "a.css";`
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// Name without the leading `@`
    pub name: String,
    /// Raw prelude between the name and the body
    pub params: String,
    /// Child nodes, `None` for statement at-rules ending in `;`
    pub nodes: Option<Vec<Node>>,
}

/// A qualified rule: selector plus block
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<Node>,
}

/// A property-value pair
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub prop: String,
    /// Raw value text, without `!important`
    pub value: String,
    pub important: bool,
}

/// A comment, body only (without `/*` and `*/`)
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
}

impl Stylesheet {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Visit every declaration in document order
    pub fn walk_declarations<F: FnMut(&Declaration)>(&self, mut f: F) {
        let mut stack = vec![self.nodes.iter()];
        while let Some(iter) = stack.last_mut() {
            match iter.next() {
                Some(Node::Declaration(declaration)) => f(declaration),
                Some(node) => {
                    if let Some(children) = node.children() {
                        stack.push(children.iter());
                    }
                }
                None => {
                    stack.pop();
                }
            }
        }
    }

    /// Visit every declaration in document order, allowing it to be modified
    pub fn walk_declarations_mut<F: FnMut(&mut Declaration)>(&mut self, mut f: F) {
        let mut stack = vec![self.nodes.iter_mut()];
        while let Some(iter) = stack.last_mut() {
            match iter.next() {
                Some(Node::Declaration(declaration)) => f(declaration),
                Some(node) => {
                    if let Some(children) = node.children_mut() {
                        stack.push(children.iter_mut());
                    }
                }
                None => {
                    stack.pop();
                }
            }
        }
    }

    /// Count at-rules with the given name (ASCII case-insensitive) at any depth
    pub fn count_at_rules(&self, name: &str) -> usize {
        let mut count = 0;
        let mut stack = vec![self.nodes.iter()];
        while let Some(iter) = stack.last_mut() {
            match iter.next() {
                Some(node) => {
                    if let Node::AtRule(at_rule) = node {
                        if at_rule.is_named(name) {
                            count += 1;
                        }
                    }
                    if let Some(children) = node.children() {
                        stack.push(children.iter());
                    }
                }
                None => {
                    stack.pop();
                }
            }
        }
        count
    }

    /// Values of every declaration of `prop`, in document order
    pub fn declaration_values(&self, prop: &str) -> Vec<String> {
        let mut values = Vec::new();
        self.walk_declarations(|declaration| {
            if declaration.prop == prop {
                values.push(declaration.value.clone());
            }
        });
        values
    }
}

impl Node {
    /// Child nodes of container nodes
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::AtRule(at_rule) => at_rule.nodes.as_deref(),
            Node::Rule(rule) => Some(&rule.nodes),
            Node::Declaration(_) | Node::Comment(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::AtRule(at_rule) => at_rule.nodes.as_mut(),
            Node::Rule(rule) => Some(&mut rule.nodes),
            Node::Declaration(_) | Node::Comment(_) => None,
        }
    }

    /// Short kind label used by the tree printer
    pub fn kind(&self) -> &'static str {
        match self {
            Node::AtRule(_) => "at_rule",
            Node::Rule(_) => "rule",
            Node::Declaration(_) => "declaration",
            Node::Comment(_) => "comment",
        }
    }
}

impl AtRule {
    pub fn new(name: impl Into<String>, params: impl Into<String>, nodes: Option<Vec<Node>>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            nodes,
        }
    }

    /// At-rule names are ASCII case-insensitive
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl Rule {
    pub fn new(selector: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            selector: selector.into(),
            nodes,
        }
    }
}

impl Declaration {
    pub fn new(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            value: value.into(),
            important: false,
        }
    }

    /// Whether this declaration defines a custom property (`--name: value`)
    pub fn is_custom_property(&self) -> bool {
        self.prop.starts_with(CUSTOM_PROPERTY_PREFIX)
    }
}

impl From<AtRule> for Node {
    fn from(at_rule: AtRule) -> Self {
        Node::AtRule(at_rule)
    }
}

impl From<Rule> for Node {
    fn from(rule: Rule) -> Self {
        Node::Rule(rule)
    }
}

impl From<Declaration> for Node {
    fn from(declaration: Declaration) -> Self {
        Node::Declaration(declaration)
    }
}
