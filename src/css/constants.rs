//! CSS Tree-sitter Node Kind Constants
//!
//! This module contains the constants for tree-sitter-css node kinds and the
//! names the normalizer reacts to. Centralizing these constants helps
//! prevent mistakes when the grammar is upgraded.

/// Tree-sitter node kinds for the CSS syntax tree

// Basic structural nodes
/// Root node of the CSS syntax tree
pub const NODE_STYLESHEET: &str = "stylesheet";
/// A CSS rule containing selectors and a declaration block
pub const NODE_RULE_SET: &str = "rule_set";
/// A block of declarations or rules enclosed in curly braces
pub const NODE_BLOCK: &str = "block";
/// A single property-value pair (e.g., `color: red;`)
pub const NODE_DECLARATION: &str = "declaration";
/// Container for one or more selectors
pub const NODE_SELECTORS: &str = "selectors";
/// CSS comment (`/* ... */`)
pub const NODE_COMMENT: &str = "comment";

// Declaration parts
/// CSS property name (e.g., `color`, `--primary`)
pub const NODE_PROPERTY_NAME: &str = "property_name";
/// `!important` flag at the end of a declaration
pub const NODE_IMPORTANT: &str = "important";
/// Colon separating property and value
pub const NODE_COLON: &str = ":";
/// Semicolon ending a declaration or statement
pub const NODE_SEMICOLON: &str = ";";

// At-rules
/// Generic CSS at-rule (e.g., `@layer`, `@font-face`)
pub const NODE_AT_RULE: &str = "at_rule";
/// `@import` statement
pub const NODE_IMPORT_STATEMENT: &str = "import_statement";
/// `@media` statement
pub const NODE_MEDIA_STATEMENT: &str = "media_statement";
/// `@supports` statement
pub const NODE_SUPPORTS_STATEMENT: &str = "supports_statement";
/// `@charset` statement
pub const NODE_CHARSET_STATEMENT: &str = "charset_statement";
/// `@namespace` statement
pub const NODE_NAMESPACE_STATEMENT: &str = "namespace_statement";
/// `@keyframes` statement
pub const NODE_KEYFRAMES_STATEMENT: &str = "keyframes_statement";
/// Body of a `@keyframes` statement
pub const NODE_KEYFRAME_BLOCK_LIST: &str = "keyframe_block_list";
/// A single keyframe (`from { ... }`, `50% { ... }`)
pub const NODE_KEYFRAME_BLOCK: &str = "keyframe_block";

/// Every node kind that is converted into an at-rule
pub const AT_RULE_KINDS: &[&str] = &[
    NODE_AT_RULE,
    NODE_IMPORT_STATEMENT,
    NODE_MEDIA_STATEMENT,
    NODE_SUPPORTS_STATEMENT,
    NODE_CHARSET_STATEMENT,
    NODE_NAMESPACE_STATEMENT,
    NODE_KEYFRAMES_STATEMENT,
];

// Normalizer vocabulary
/// Cascade layer at-rule name
pub const LAYER_AT_RULE: &str = "layer";
/// Import at-rule name
pub const IMPORT_AT_RULE: &str = "import";
/// Media at-rule name, used to wrap conditional imports
pub const MEDIA_AT_RULE: &str = "media";
/// Supports at-rule name, used to wrap `supports(...)` imports
pub const SUPPORTS_AT_RULE: &str = "supports";
/// Prefix of custom property names
pub const CUSTOM_PROPERTY_PREFIX: &str = "--";
/// Token that marks a value as still referencing a custom property
pub const VAR_FUNCTION_OPEN: &str = "var(";
/// Upper bound on substitution passes over the stylesheet
pub const MAX_ITERATIONS: usize = 10;

// Built-in plugin names, in the order the default pipeline runs them
/// Inlines `@import` statements while loading
pub const PLUGIN_IMPORT: &str = "import";
/// Unwraps `@layer` blocks
pub const PLUGIN_REMOVE_LAYERS: &str = "remove-layers";
/// Substitutes custom property references
pub const PLUGIN_RESOLVE_VARS: &str = "resolve-vars";
