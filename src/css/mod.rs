//! CSS normalization
//!
//! Converts stylesheets that use cascade layers and custom properties into
//! static CSS:
//! - tree-sitter-css for parsing into a mutable stylesheet model, with a
//!   cssparser fallback for constructs the grammar does not know
//! - plugins for layer flattening and `var()` resolution
//! - malva for optional pretty output

pub mod constants;
pub mod error;
pub mod formatter;
pub mod imports;
pub mod layer_flattener;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod printer;
pub mod stylesheet;
pub mod tolerant_parser;
pub mod tree_printer;
pub mod variable_resolver;

#[cfg(test)]
mod normalizer_tests;
#[cfg(test)]
mod variable_resolver_tests;
