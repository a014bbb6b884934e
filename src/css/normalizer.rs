//! Normalization entry point
//!
//! Ties loading, the plugin pipeline and output rendering together.

use std::fs;
use std::path::Path;

use log::info;

use crate::config::NormalizerConfig;
use crate::css::error::{IoContext, NormalizeResult};
use crate::css::formatter::CssFormatter;
use crate::css::imports::ImportInliner;
use crate::css::parser::CssParser;
use crate::css::pipeline::Processor;
use crate::css::printer::to_css;
use crate::css::stylesheet::Stylesheet;

/// Runs the configured pipeline over stylesheets
pub struct Normalizer {
    config: NormalizerConfig,
    processor: Processor,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> NormalizeResult<Self> {
        let processor = Processor::from_names(&config.plugins)?;
        info!("Normalizer pipeline: {:?}", config.plugins);
        Ok(Self { config, processor })
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Read a stylesheet from disk, inlining imports when configured
    pub fn load(&self, path: &Path) -> NormalizeResult<Stylesheet> {
        if self.config.inlines_imports() {
            return ImportInliner::new()?.load(path);
        }

        let content = fs::read_to_string(path).with_path(path)?;
        CssParser::new()?
            .parse_stylesheet(&content)
            .map_err(|e| e.in_file(path))
    }

    /// Apply every plugin to the stylesheet in place
    pub fn normalize(&self, sheet: &mut Stylesheet) {
        let replaced = self.processor.process(sheet);
        info!("Normalization finished, {} at-rules replaced", replaced);
    }

    /// Serialize the stylesheet, pretty-printed when configured
    pub fn render(&self, sheet: &Stylesheet) -> NormalizeResult<String> {
        let css = to_css(sheet);
        if self.config.pretty {
            CssFormatter::new().format_css(&css)
        } else {
            Ok(css)
        }
    }

    /// Normalize CSS source text. Imports are not inlined: there is no base directory.
    pub fn normalize_str(&self, content: &str) -> NormalizeResult<String> {
        let mut sheet = CssParser::new()?.parse_stylesheet(content)?;
        self.normalize(&mut sheet);
        self.render(&sheet)
    }

    /// Load, normalize and render a stylesheet file
    pub fn normalize_file(&self, path: &Path) -> NormalizeResult<String> {
        let mut sheet = self.load(path)?;
        self.normalize(&mut sheet);
        self.render(&sheet)
    }
}
