//! Normalizer configuration
//!
//! Configuration is read from YAML (or JSON, chosen by file extension) and
//! lists the plugins to run in order, mirroring a CSS pipeline config:
//!
//! ```yaml
//! plugins: [import, remove-layers, resolve-vars]
//! pretty: false
//! log_level: info
//! log_file: null
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::css::constants::{PLUGIN_IMPORT, PLUGIN_REMOVE_LAYERS, PLUGIN_RESOLVE_VARS};
use crate::css::error::{IoContext, NormalizeError, NormalizeResult};
use crate::css::pipeline::builtin_plugin;

/// File looked up in the working directory when no config is given
pub const LOCAL_CONFIG_FILE: &str = "css-normalizer.yaml";
/// Directory under the platform config dir holding `config.yaml`
pub const CONFIG_DIR_NAME: &str = "css-normalizer";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Plugin names, in execution order
    pub plugins: Vec<String>,
    /// Pretty-print output with malva
    pub pretty: bool,
    /// One of off, error, warn, info, debug, trace
    pub log_level: String,
    /// Log destination, stderr when unset
    pub log_file: Option<PathBuf>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            plugins: vec![
                PLUGIN_IMPORT.to_string(),
                PLUGIN_REMOVE_LAYERS.to_string(),
                PLUGIN_RESOLVE_VARS.to_string(),
            ],
            pretty: false,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl NormalizerConfig {
    /// Read and validate a config file
    pub fn from_file(path: &Path) -> NormalizeResult<Self> {
        let content = fs::read_to_string(path).with_path(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config: Self = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Find the config to use: explicit path, local file, user config dir, defaults
    pub fn discover(explicit: Option<&Path>) -> NormalizeResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for candidate in Self::candidate_paths() {
            if candidate.is_file() {
                log::debug!("Using config file {}", candidate.display());
                return Self::from_file(&candidate);
            }
        }

        Ok(Self::default())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(CONFIG_DIR_NAME).join("config.yaml"));
        }
        candidates
    }

    /// Check plugin names and log level
    pub fn validate(&self) -> NormalizeResult<()> {
        for name in &self.plugins {
            builtin_plugin(name)?;
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> NormalizeResult<LevelFilter> {
        LevelFilter::from_str(&self.log_level).map_err(|_| NormalizeError::Config {
            message: format!("invalid log level '{}'", self.log_level),
        })
    }

    /// Whether imports are inlined while loading
    pub fn inlines_imports(&self) -> bool {
        self.plugins.iter().any(|name| name == PLUGIN_IMPORT)
    }
}
