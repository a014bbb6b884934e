//! CSS Formatter
//!
//! Pretty-prints normalized output using the malva CSS formatter.

use malva::{config::FormatOptions, format_text, Syntax};

use crate::css::error::{NormalizeError, NormalizeResult};

/// CSS formatter used when pretty output is requested
pub struct CssFormatter {
    format_options: FormatOptions,
}

impl CssFormatter {
    /// Create a new formatter with default options
    pub fn new() -> Self {
        Self {
            format_options: FormatOptions::default(),
        }
    }

    /// Format a complete stylesheet
    pub fn format_css(&self, content: &str) -> NormalizeResult<String> {
        format_text(content, Syntax::Css, &self.format_options).map_err(|e| {
            log::warn!("Failed to format CSS output: {}", e);
            NormalizeError::Format {
                message: e.to_string(),
            }
        })
    }
}

impl Default for CssFormatter {
    fn default() -> Self {
        Self::new()
    }
}
