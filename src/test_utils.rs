//! Test utilities shared across the codebase

use std::fs;
use std::path::{Path, PathBuf};

use crate::css::parser::CssParser;
use crate::css::stylesheet::Stylesheet;

/// Parse CSS that is expected to be valid
pub fn parse_css(content: &str) -> Stylesheet {
    let mut parser = CssParser::new().expect("Failed to create CSS parser");
    parser
        .parse_stylesheet(content)
        .unwrap_or_else(|e| panic!("Failed to parse test CSS: {}", e))
}

/// Write a fixture file, creating parent directories as needed
pub fn write_fixture(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, content).expect("Failed to write fixture");
    path
}
