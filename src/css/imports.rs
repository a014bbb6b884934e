//! Import inlining
//!
//! Replaces top-level `@import` statements with the contents of the imported
//! file before the stylesheet is transformed:
//!
//! - `@import "theme.css";` and `@import url(theme.css);` are resolved
//!   relative to the importing file
//! - `layer`/`layer(name)`, `supports(...)` and media query clauses wrap the
//!   imported nodes in `@layer`, `@supports` and `@media` respectively, the
//!   media wrapper outermost
//! - remote imports (`https://...`, `//cdn/...`, `data:`) stay in place
//! - a file that was already inlined during this load is not inlined again,
//!   which also breaks import cycles

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use url::Url;

use crate::css::constants::{IMPORT_AT_RULE, LAYER_AT_RULE, MEDIA_AT_RULE, SUPPORTS_AT_RULE};
use crate::css::error::{IoContext, NormalizeResult};
use crate::css::parser::CssParser;
use crate::css::stylesheet::{AtRule, Node, Stylesheet};

/// Target of an `@import` statement
#[derive(Debug, Clone, PartialEq)]
pub struct ImportTarget {
    /// Unquoted href as written
    pub href: String,
    /// Cascade layer name; empty for an anonymous `layer`
    pub layer: Option<String>,
    /// Condition inside `supports(...)`
    pub supports: Option<String>,
    /// Media query list, empty when unconditional
    pub media: String,
}

impl ImportTarget {
    /// Split import params such as `url("a.css") layer(base) screen` into
    /// href, layer, supports condition and media
    pub fn from_params(params: &str) -> Option<Self> {
        let params = params.trim();

        let (href, rest) = if let Some(inner) = strip_prefix_ignore_case(params, "url(") {
            let close = inner.find(')')?;
            (unquote(inner[..close].trim())?, &inner[close + 1..])
        } else {
            let quote = params.chars().next().filter(|c| *c == '"' || *c == '\'')?;
            let end = params[1..].find(quote)? + 1;
            (params[1..end].to_string(), &params[end + 1..])
        };

        let mut rest = rest.trim_start();

        let mut layer = None;
        if let Some(inner) = strip_prefix_ignore_case(rest, "layer(") {
            let close = closing_paren(inner)?;
            layer = Some(inner[..close].trim().to_string());
            rest = inner[close + 1..].trim_start();
        } else if let Some(after) = strip_prefix_ignore_case(rest, "layer")
            && (after.is_empty() || after.starts_with(char::is_whitespace))
        {
            layer = Some(String::new());
            rest = after.trim_start();
        }

        let mut supports = None;
        if let Some(inner) = strip_prefix_ignore_case(rest, "supports(") {
            let close = closing_paren(inner)?;
            supports = Some(inner[..close].trim().to_string());
            rest = inner[close + 1..].trim_start();
        }

        Some(Self {
            href,
            layer,
            supports,
            media: rest.trim().to_string(),
        })
    }

    /// Wrap imported nodes in the at-rules this import is conditioned on
    pub fn wrap(self, nodes: Vec<Node>) -> Vec<Node> {
        let mut nodes = nodes;
        if let Some(layer) = self.layer {
            nodes = vec![Node::AtRule(AtRule::new(LAYER_AT_RULE, layer, Some(nodes)))];
        }
        if let Some(condition) = self.supports {
            nodes = vec![Node::AtRule(AtRule::new(
                SUPPORTS_AT_RULE,
                supports_params(&condition),
                Some(nodes),
            ))];
        }
        if !self.media.is_empty() {
            nodes = vec![Node::AtRule(AtRule::new(MEDIA_AT_RULE, self.media, Some(nodes)))];
        }
        nodes
    }

    /// Whether the href points outside the local file system
    pub fn is_remote(&self) -> bool {
        self.href.starts_with("//") || Url::parse(&self.href).is_ok()
    }
}

/// Byte index of the `)` closing a group whose `(` was already consumed
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (index, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// `supports(display: grid)` becomes `@supports (display: grid)`
fn supports_params(condition: &str) -> String {
    let bare_declaration = !condition.starts_with('(')
        && strip_prefix_ignore_case(condition, "not ").is_none()
        && strip_prefix_ignore_case(condition, "selector(").is_none();
    if bare_declaration {
        format!("({})", condition)
    } else {
        condition.to_string()
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

/// Remove matching quotes; unquoted `url()` arguments are returned as-is
fn unquote(text: &str) -> Option<String> {
    match text.chars().next() {
        Some(quote @ ('"' | '\'')) => text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
            .map(|inner| inner.to_string()),
        Some(_) => Some(text.to_string()),
        None => None,
    }
}

/// Loads stylesheets, inlining local imports
pub struct ImportInliner {
    parser: CssParser,
    seen: HashSet<PathBuf>,
}

impl ImportInliner {
    pub fn new() -> NormalizeResult<Self> {
        Ok(Self {
            parser: CssParser::new()?,
            seen: HashSet::new(),
        })
    }

    /// Load `path` and inline everything it imports
    pub fn load(&mut self, path: &Path) -> NormalizeResult<Stylesheet> {
        self.seen.clear();
        let path = fs::canonicalize(path).with_path(path)?;
        self.seen.insert(path.clone());
        let sheet = self.load_recursive(&path)?;
        info!("Loaded {} with {} imported files", path.display(), self.seen.len() - 1);
        Ok(sheet)
    }

    fn load_recursive(&mut self, path: &Path) -> NormalizeResult<Stylesheet> {
        let content = fs::read_to_string(path).with_path(path)?;
        let sheet = self
            .parser
            .parse_stylesheet(&content)
            .map_err(|e| e.in_file(path))?;

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut nodes = Vec::with_capacity(sheet.nodes.len());

        for node in sheet.nodes {
            match node {
                Node::AtRule(at_rule) if at_rule.is_named(IMPORT_AT_RULE) && at_rule.nodes.is_none() => {
                    nodes.extend(self.inline_import(at_rule, &base_dir)?);
                }
                other => nodes.push(other),
            }
        }

        Ok(Stylesheet::new(nodes))
    }

    /// Nodes that replace one `@import` statement
    fn inline_import(&mut self, at_rule: AtRule, base_dir: &Path) -> NormalizeResult<Vec<Node>> {
        let Some(target) = ImportTarget::from_params(&at_rule.params) else {
            debug!("Leaving unrecognized import '{}' in place", at_rule.params);
            return Ok(vec![Node::AtRule(at_rule)]);
        };

        if target.is_remote() {
            debug!("Leaving remote import '{}' in place", target.href);
            return Ok(vec![Node::AtRule(at_rule)]);
        }

        let decoded = urlencoding::decode(&target.href)
            .map(|href| href.into_owned())
            .unwrap_or_else(|_| target.href.clone());
        let joined = base_dir.join(&decoded);
        let resolved = fs::canonicalize(&joined).with_path(&joined)?;

        if !self.seen.insert(resolved.clone()) {
            debug!("Skipping already imported {}", resolved.display());
            return Ok(Vec::new());
        }

        debug!("Inlining {}", resolved.display());
        let imported = self.load_recursive(&resolved)?;

        Ok(target.wrap(imported.nodes))
    }
}
