//! Plugin host
//!
//! Runs normalization plugins over a stylesheet. A plugin can register two
//! kinds of hooks:
//!
//! - an at-rule visitor, called for every at-rule whose name matches the
//!   plugin's registered name during one host-managed traversal
//! - a whole-document `once` hook, called exactly once per document
//!
//! All `once` hooks run first, in registration order, followed by the
//! at-rule traversal.

use log::debug;

use crate::css::constants::{PLUGIN_IMPORT, PLUGIN_REMOVE_LAYERS, PLUGIN_RESOLVE_VARS};
use crate::css::error::{NormalizeError, NormalizeResult};
use crate::css::layer_flattener::LayerFlattener;
use crate::css::stylesheet::{AtRule, Node, Stylesheet};
use crate::css::variable_resolver::VariableResolver;

/// Outcome of an at-rule visit
#[derive(Debug, Clone, PartialEq)]
pub enum Visit {
    /// Leave the at-rule in place; its children are traversed afterwards
    Keep(AtRule),
    /// Splice these nodes in at the at-rule's position; they are re-examined
    Replace(Vec<Node>),
}

/// A stylesheet transform hooked into the processor
pub trait Plugin {
    fn name(&self) -> &str;

    /// Name of the at-rules this plugin wants to visit
    fn visits_at_rule(&self) -> Option<&str> {
        None
    }

    fn visit_at_rule(&self, at_rule: AtRule) -> Visit {
        Visit::Keep(at_rule)
    }

    /// Whole-document hook
    fn once(&self, _root: &mut Stylesheet) {}
}

/// Ordered list of plugins applied to a stylesheet
#[derive(Default)]
pub struct Processor {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Processor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a processor from built-in plugin names
    ///
    /// `import` is accepted but skipped: imports are inlined while loading.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> NormalizeResult<Self> {
        let mut processor = Self::new();
        for name in names {
            if let Some(plugin) = builtin_plugin(name.as_ref())? {
                processor.add(plugin);
            }
        }
        Ok(processor)
    }

    pub fn add(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn with_plugin(mut self, plugin: Box<dyn Plugin>) -> Self {
        self.add(plugin);
        self
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }

    /// Run every plugin over the stylesheet. Returns the number of at-rules replaced.
    pub fn process(&self, sheet: &mut Stylesheet) -> usize {
        for plugin in &self.plugins {
            debug!("Running once hook of plugin '{}'", plugin.name());
            plugin.once(sheet);
        }

        let visitors: Vec<&dyn Plugin> = self
            .plugins
            .iter()
            .map(|plugin| &**plugin)
            .filter(|plugin| plugin.visits_at_rule().is_some())
            .collect();

        visit_at_rules(sheet, &visitors)
    }
}

/// Look up a built-in plugin by its configuration name
pub fn builtin_plugin(name: &str) -> NormalizeResult<Option<Box<dyn Plugin>>> {
    match name {
        PLUGIN_IMPORT => Ok(None),
        PLUGIN_REMOVE_LAYERS => Ok(Some(Box::new(LayerFlattener::new()))),
        PLUGIN_RESOLVE_VARS => Ok(Some(Box::new(VariableResolver::new()))),
        _ => Err(NormalizeError::UnknownPlugin {
            name: name.to_string(),
        }),
    }
}

/// Traverse the tree and dispatch matching at-rules to the visitors
///
/// Each container is fully processed before its children are queued, so
/// nodes spliced in by a replacement are examined again at the same
/// position. Returns the number of replacements made.
pub fn visit_at_rules(sheet: &mut Stylesheet, visitors: &[&dyn Plugin]) -> usize {
    if visitors.is_empty() {
        return 0;
    }

    let mut replaced = 0;
    let mut pending: Vec<&mut Vec<Node>> = vec![&mut sheet.nodes];

    while let Some(container) = pending.pop() {
        replaced += visit_container(container, visitors);

        let children: Vec<&mut Vec<Node>> = container
            .iter_mut()
            .filter_map(|node| node.children_mut())
            .collect();
        // reversed so containers are handled in document order
        pending.extend(children.into_iter().rev());
    }

    replaced
}

fn visit_container(nodes: &mut Vec<Node>, visitors: &[&dyn Plugin]) -> usize {
    let mut replaced = 0;
    let mut index = 0;

    while index < nodes.len() {
        let at_rule = match &mut nodes[index] {
            Node::AtRule(at_rule) if visitors.iter().any(|visitor| wants(*visitor, at_rule)) => {
                std::mem::replace(at_rule, AtRule::new("", "", None))
            }
            _ => {
                index += 1;
                continue;
            }
        };

        match dispatch(at_rule, visitors) {
            Visit::Keep(at_rule) => {
                nodes[index] = Node::AtRule(at_rule);
                index += 1;
            }
            Visit::Replace(replacement) => {
                nodes.splice(index..=index, replacement);
                replaced += 1;
            }
        }
    }

    replaced
}

fn wants(visitor: &dyn Plugin, at_rule: &AtRule) -> bool {
    visitor
        .visits_at_rule()
        .is_some_and(|name| at_rule.is_named(name))
}

/// Offer the at-rule to each interested visitor until one replaces it
fn dispatch(at_rule: AtRule, visitors: &[&dyn Plugin]) -> Visit {
    let mut current = at_rule;
    for visitor in visitors {
        if !wants(*visitor, &current) {
            continue;
        }
        match visitor.visit_at_rule(current) {
            Visit::Keep(kept) => current = kept,
            replaced @ Visit::Replace(_) => return replaced,
        }
    }
    Visit::Keep(current)
}
