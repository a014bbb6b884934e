//! Custom property resolution
//!
//! Replaces `var()` references in declaration values with literal text so the
//! output can be consumed by renderers without custom property support.
//!
//! Resolution runs in three phases:
//!
//! 1. **Collection**: every `--name: value` declaration is recorded in a
//!    [`VariableTable`]. Custom properties are treated as globally scoped:
//!    when a name is defined more than once, the last definition in document
//!    order wins regardless of the selector it appears in.
//! 2. **Substitution**: references to known names are replaced with their
//!    raw values, pass after pass, until a pass changes nothing or
//!    [`MAX_ITERATIONS`] passes have run. The cap keeps circular definitions
//!    (`--a: var(--b); --b: var(--a);`) from looping forever.
//! 3. **Cleanup**: any `var()` left over is replaced with its fallback, or
//!    with nothing when there is no fallback.
//!
//! Matching is textual. A fallback is captured up to the first `)`, so a
//! fallback that itself contains a `var()` with a fallback, such as
//! `var(--a, var(--b, 5px))`, is truncated at the inner closing parenthesis.

use std::collections::HashMap;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::{Captures, Regex};

use crate::css::constants::{MAX_ITERATIONS, PLUGIN_RESOLVE_VARS, VAR_FUNCTION_OPEN};
use crate::css::pipeline::Plugin;
use crate::css::stylesheet::Stylesheet;

/// Matches any remaining `var(name)` or `var(name, fallback)`
static LEFTOVER_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"var\([^,)]+(?:,\s*([^)]+))?\)").expect("Failed to compile leftover var regex")
});

/// Custom property name to raw value, in first-definition order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every custom property definition in the stylesheet
    pub fn collect(sheet: &Stylesheet) -> Self {
        let mut table = Self::new();
        sheet.walk_declarations(|declaration| {
            if declaration.is_custom_property() {
                table.define(&declaration.prop, &declaration.value);
            }
        });
        table
    }

    /// Record a definition, overwriting any earlier value for the same name
    pub fn define(&mut self, name: &str, value: &str) {
        match self.index.get(name) {
            Some(&position) => self.entries[position].1 = value.to_string(),
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), value.to_string()));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&position| self.entries[position].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Summary of one resolution run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionReport {
    /// Number of distinct custom properties collected
    pub variables: usize,
    /// Substitution passes performed
    pub iterations: usize,
    /// Whether the last pass still changed something
    pub hit_iteration_cap: bool,
    /// Declarations rewritten by the cleanup phase
    pub cleaned_up: usize,
}

/// Resolves `var()` references in a stylesheet
#[derive(Debug, Clone, Default)]
pub struct VariableResolver;

impl VariableResolver {
    pub fn new() -> Self {
        Self
    }

    /// Run collection, substitution and cleanup over the stylesheet
    pub fn resolve(&self, sheet: &mut Stylesheet) -> ResolutionReport {
        let table = VariableTable::collect(sheet);
        debug!("Collected {} custom properties", table.len());

        let (iterations, hit_iteration_cap) = substitute(sheet, &table);
        if hit_iteration_cap {
            warn!(
                "Variable substitution stopped after {} passes; circular definitions are left to cleanup",
                iterations
            );
        }

        let cleaned_up = clean_up(sheet);
        if cleaned_up > 0 {
            debug!("Cleanup rewrote {} declarations with unresolved references", cleaned_up);
        }

        ResolutionReport {
            variables: table.len(),
            iterations,
            hit_iteration_cap,
            cleaned_up,
        }
    }
}

impl Plugin for VariableResolver {
    fn name(&self) -> &str {
        PLUGIN_RESOLVE_VARS
    }

    fn once(&self, root: &mut Stylesheet) {
        let report = self.resolve(root);
        debug!("Variable resolution finished: {:?}", report);
    }
}

/// Pattern for `var(<name>)` / `var(<name>, <fallback>)` with the name taken literally
fn reference_pattern(name: &str) -> Regex {
    let pattern = format!(r"var\({}(?:,\s*([^)]+))?\)", regex::escape(name));
    Regex::new(&pattern).expect("Failed to compile variable reference regex")
}

/// Substitute known references until nothing changes or the pass limit is hit.
/// Returns the number of passes and whether the limit stopped it.
fn substitute(sheet: &mut Stylesheet, table: &VariableTable) -> (usize, bool) {
    let patterns: Vec<(&str, Regex)> = table
        .iter()
        .map(|(name, _)| (name, reference_pattern(name)))
        .collect();

    let mut changed = true;
    let mut iterations = 0;

    while changed && iterations < MAX_ITERATIONS {
        changed = false;
        iterations += 1;

        sheet.walk_declarations_mut(|declaration| {
            if !declaration.value.contains(VAR_FUNCTION_OPEN) {
                return;
            }

            let mut resolved = declaration.value.clone();
            for (name, pattern) in &patterns {
                resolved = pattern
                    .replace_all(&resolved, |caps: &Captures| {
                        match table.get(name) {
                            Some(value) => value.to_string(),
                            None => fallback(caps),
                        }
                    })
                    .into_owned();
            }

            if resolved != declaration.value {
                declaration.value = resolved;
                changed = true;
            }
        });
    }

    (iterations, changed)
}

/// Replace whatever `var()` survived substitution with its fallback or nothing
fn clean_up(sheet: &mut Stylesheet) -> usize {
    let mut rewritten = 0;

    sheet.walk_declarations_mut(|declaration| {
        if !declaration.value.contains(VAR_FUNCTION_OPEN) {
            return;
        }

        let cleaned = LEFTOVER_VAR.replace_all(&declaration.value, fallback).into_owned();
        if cleaned != declaration.value {
            warn!(
                "Unresolved variable reference in '{}: {}' replaced with '{}'",
                declaration.prop, declaration.value, cleaned
            );
            declaration.value = cleaned;
            rewritten += 1;
        }
    });

    rewritten
}

fn fallback(caps: &Captures) -> String {
    caps.get(1)
        .map(|fallback| fallback.as_str().to_string())
        .unwrap_or_default()
}
