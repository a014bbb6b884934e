//! Error types for the CSS normalizer
//!
//! The transforms themselves never fail; these errors cover loading,
//! parsing, configuration and output formatting.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for normalizer operations
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// IO errors (reading stylesheets, writing output, reading config)
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stylesheet could not be parsed
    #[error(
        "Syntax error{} at line {line}, column {column}",
        .file.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default()
    )]
    Syntax {
        file: Option<PathBuf>,
        line: usize,
        column: usize,
    },

    /// Tree-sitter language setup errors
    #[error("Failed to set up tree-sitter language: {message}")]
    TreeSitterLanguage { message: String },

    /// Tree-sitter returned no tree at all
    #[error("Parser produced no syntax tree")]
    NoTree,

    /// Invalid configuration values
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// YAML configuration parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON configuration parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Plugin name in the configuration is not a built-in plugin
    #[error("Unknown plugin '{name}'")]
    UnknownPlugin { name: String },

    /// Pretty-printing the output failed
    #[error("Formatting failed: {message}")]
    Format { message: String },
}

impl NormalizeError {
    /// Attach the file a syntax error came from. Other variants are returned unchanged.
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            NormalizeError::Syntax { file: None, line, column } => NormalizeError::Syntax {
                file: Some(path.to_path_buf()),
                line,
                column,
            },
            other => other,
        }
    }
}

/// Result type alias for normalizer operations
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Helper trait for converting IO errors with the path involved
pub trait IoContext<T> {
    fn with_path(self, path: &Path) -> NormalizeResult<T>;
}

impl<T> IoContext<T> for Result<T, std::io::Error> {
    fn with_path(self, path: &Path) -> NormalizeResult<T> {
        self.map_err(|e| NormalizeError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
