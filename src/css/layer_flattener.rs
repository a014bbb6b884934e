//! Cascade layer flattening
//!
//! The target renderer has no notion of cascade layers, so every `@layer`
//! at-rule is replaced by its children at the same position. Statement
//! layers (`@layer a, b;`) have no children and are simply removed. No
//! layer priority is computed: content keeps its document order.

use log::debug;

use crate::css::constants::{LAYER_AT_RULE, PLUGIN_REMOVE_LAYERS};
use crate::css::pipeline::{visit_at_rules, Plugin, Visit};
use crate::css::stylesheet::{AtRule, Stylesheet};

/// Unwraps `@layer` at-rules at every depth
#[derive(Debug, Clone, Default)]
pub struct LayerFlattener;

impl LayerFlattener {
    pub fn new() -> Self {
        Self
    }

    /// Remove every layer at-rule in the stylesheet, returning how many were removed
    pub fn flatten(&self, sheet: &mut Stylesheet) -> usize {
        let removed = visit_at_rules(sheet, &[self]);
        debug!("Flattened {} layer at-rules", removed);
        removed
    }
}

impl Plugin for LayerFlattener {
    fn name(&self) -> &str {
        PLUGIN_REMOVE_LAYERS
    }

    fn visits_at_rule(&self) -> Option<&str> {
        Some(LAYER_AT_RULE)
    }

    fn visit_at_rule(&self, at_rule: AtRule) -> Visit {
        Visit::Replace(at_rule.nodes.unwrap_or_default())
    }
}
