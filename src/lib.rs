//! CSS Normalizer Library
//!
//! Rewrites stylesheets for renderers that only understand static CSS:
//! cascade layers are flattened and custom property references are replaced
//! with literal values.

pub mod config;
pub mod css;
#[cfg(test)]
pub mod test_utils;

pub use config::NormalizerConfig;
pub use css::error::{NormalizeError, NormalizeResult};
pub use css::normalizer::Normalizer;
