//! Translated string lookup.
//!
//! Language files are plain `KEY=value` lines. Every lookup carries the
//! English default, so a missing file or key never leaves a blank label.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Translator {
    strings: HashMap<String, String>,
}

impl Translator {
    /// Translator with no loaded strings (every lookup returns its default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a language file. A missing file yields an empty translator.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("Language file {:?} not found, using built-in strings", path);
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_str_content(&content))
    }

    /// Parse language-file content
    pub fn from_str_content(content: &str) -> Self {
        let strings = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), v.trim().replace("\\n", "\n")))
            .collect();
        Self { strings }
    }

    /// Translate `key`, falling back to `default`
    pub fn tr(&self, key: &str, default: &str) -> String {
        match self.strings.get(key) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => default.to_string(),
        }
    }

    /// Translate `key` and substitute `%1` with `arg`
    pub fn tr_arg(&self, key: &str, default: &str, arg: &str) -> String {
        self.tr(key, default).replace("%1", arg)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
