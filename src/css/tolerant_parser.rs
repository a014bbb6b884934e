//! Structure-only CSS parsing with cssparser
//!
//! Fallback for stylesheets tree-sitter-css flags with errors although they
//! are valid CSS, such as range media queries (`@media (width >= 40rem)`),
//! empty custom properties (`--x: ;`) or `@import "a.css" layer(base);`.
//!
//! Only block structure is recovered. At-rule preludes, selectors and
//! declaration values are kept as raw source text, trimmed, exactly like the
//! tree-sitter conversion stores them. Anything whose boundaries cannot be
//! recovered (an unclosed block, a stray `}`, text that is neither a rule nor
//! a `prop: value` declaration) is reported as a syntax error.

use std::sync::LazyLock;

use cssparser::{ParseError, Parser, ParserInput, SourceLocation, SourcePosition, Token};
use log::warn;
use regex::Regex;

use crate::css::error::{NormalizeError, NormalizeResult};
use crate::css::stylesheet::{AtRule, Comment, Declaration, Node, Rule, Stylesheet};

static IMPORTANT_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)!\s*important\s*$").expect("Failed to compile important regex"));

/// A structural problem found while scanning
#[derive(Debug, Clone, PartialEq)]
struct Issue {
    line: usize,
    column: usize,
    message: &'static str,
}

impl Issue {
    fn at(location: SourceLocation, message: &'static str) -> Self {
        Self {
            // cssparser lines are 0-based, columns 1-based
            line: location.line as usize + 1,
            column: location.column as usize,
            message,
        }
    }
}

/// Parse CSS content into a stylesheet, keeping unparsed text verbatim
pub fn parse_tolerant(content: &str) -> NormalizeResult<Stylesheet> {
    let mut input = ParserInput::new(content);
    let mut parser = Parser::new(&mut input);
    let mut issues = Vec::new();

    let nodes = parse_items(&mut parser, &mut issues);

    for issue in &issues {
        warn!("{} at line {}, column {}", issue.message, issue.line, issue.column);
    }
    match issues.first() {
        Some(issue) => Err(NormalizeError::Syntax {
            file: None,
            line: issue.line,
            column: issue.column,
        }),
        None => Ok(Stylesheet::new(nodes)),
    }
}

fn next_token<'i>(parser: &mut Parser<'i, '_>) -> Option<Token<'i>> {
    parser.next_including_whitespace_and_comments().ok().cloned()
}

/// Items of the stylesheet or of one block, until the input is exhausted
fn parse_items<'i>(parser: &mut Parser<'i, '_>, issues: &mut Vec<Issue>) -> Vec<Node> {
    let mut nodes = Vec::new();

    loop {
        let state = parser.state();
        let Some(token) = next_token(parser) else {
            break;
        };

        match token {
            Token::WhiteSpace(_) | Token::Semicolon => {}
            Token::Comment(text) => nodes.push(Node::Comment(Comment {
                text: text.to_string(),
            })),
            Token::AtKeyword(name) => {
                let at_rule = parse_at_rule(parser, name.to_string(), state.source_location(), issues);
                nodes.push(Node::AtRule(at_rule));
            }
            Token::CloseCurlyBracket => issues.push(Issue::at(state.source_location(), "Unexpected '}'")),
            _ => {
                parser.reset(&state);
                if let Some(node) = parse_rule_or_declaration(parser, issues) {
                    nodes.push(node);
                }
            }
        }
    }

    nodes
}

fn parse_at_rule<'i>(
    parser: &mut Parser<'i, '_>,
    name: String,
    location: SourceLocation,
    issues: &mut Vec<Issue>,
) -> AtRule {
    let prelude_start = parser.position();

    loop {
        let before = parser.position();
        match next_token(parser) {
            Some(Token::Semicolon) => {
                let params = parser.slice(prelude_start..before).trim().to_string();
                return AtRule::new(name, params, None);
            }
            Some(Token::CurlyBracketBlock) => {
                let params = parser.slice(prelude_start..before).trim().to_string();
                let nodes = parse_block(parser, before, location, issues);
                return AtRule::new(name, params, Some(nodes));
            }
            Some(_) => {}
            None => {
                let params = parser.slice_from(prelude_start).trim().to_string();
                return AtRule::new(name, params, None);
            }
        }
    }
}

/// Parse the block whose `{` token was just returned
fn parse_block<'i>(
    parser: &mut Parser<'i, '_>,
    block_start: SourcePosition,
    location: SourceLocation,
    issues: &mut Vec<Issue>,
) -> Vec<Node> {
    let nodes = parser
        .parse_nested_block(|nested| Ok::<_, ParseError<'i, ()>>(parse_items(nested, issues)))
        .unwrap_or_default();

    if !parser.slice_from(block_start).ends_with('}') {
        issues.push(Issue::at(location, "Unclosed block"));
    }
    nodes
}

fn parse_rule_or_declaration<'i>(parser: &mut Parser<'i, '_>, issues: &mut Vec<Issue>) -> Option<Node> {
    let location = parser.current_source_location();
    let start = parser.position();
    let mut colon: Option<(SourcePosition, SourcePosition)> = None;

    loop {
        let before = parser.position();
        let Some(token) = next_token(parser) else {
            let end = parser.position();
            return declaration(parser, start..end, colon, location, issues);
        };

        match token {
            Token::Colon if colon.is_none() => colon = Some((before, parser.position())),
            Token::Semicolon => return declaration(parser, start..before, colon, location, issues),
            Token::CurlyBracketBlock => {
                let selector = parser.slice(start..before).trim().to_string();
                let nodes = parse_block(parser, before, location, issues);
                return Some(Node::Rule(Rule::new(selector, nodes)));
            }
            Token::CloseCurlyBracket => {
                issues.push(Issue::at(parser.current_source_location(), "Unexpected '}'"));
                return declaration(parser, start..before, colon, location, issues);
            }
            _ => {}
        }
    }
}

fn declaration(
    parser: &Parser<'_, '_>,
    range: std::ops::Range<SourcePosition>,
    colon: Option<(SourcePosition, SourcePosition)>,
    location: SourceLocation,
    issues: &mut Vec<Issue>,
) -> Option<Node> {
    let Some((colon_start, value_start)) = colon else {
        if !parser.slice(range).trim().is_empty() {
            issues.push(Issue::at(location, "Unknown word"));
        }
        return None;
    };

    let prop = parser.slice(range.start..colon_start).trim();
    if prop.is_empty() {
        issues.push(Issue::at(location, "Missing property name"));
        return None;
    }

    let (value, important) = split_important_tail(parser.slice(value_start..range.end));
    Some(Node::Declaration(Declaration {
        prop: prop.to_string(),
        value,
        important,
    }))
}

fn split_important_tail(value: &str) -> (String, bool) {
    match IMPORTANT_TAIL.find(value) {
        Some(found) => (value[..found.start()].trim().to_string(), true),
        None => (value.trim().to_string(), false),
    }
}
