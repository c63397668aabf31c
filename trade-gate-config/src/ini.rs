//! Minimal INI codec for profile and application settings files.
//!
//! Keys are addressed as `Group/Key`. A key without a group lives in the
//! `[General]` section, matching how the trading client writes its global
//! settings. Section and key order are preserved on save.

use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Section used for keys that carry no `Group/` prefix.
pub const GENERAL_SECTION: &str = "General";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

/// In-memory INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<Section>,
}

fn split_key(key: &str) -> (&str, &str) {
    match key.split_once('/') {
        Some((group, name)) => (group, name),
        None => (GENERAL_SECTION, key),
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1].replace("\\\"", "\"")
    } else {
        value.to_string()
    }
}

fn quote_if_needed(value: &str) -> String {
    let needs_quotes = value != value.trim()
        || value.contains(';')
        || value.contains('#')
        || value.contains(',');
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

impl IniDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI text.
    ///
    /// Blank lines and lines starting with `;` or `#` are skipped. Entries
    /// that appear before any section header go into `[General]`. Lines that
    /// are neither a header nor a `key=value` pair are logged and ignored so
    /// one stray line never hides the rest of the file.
    pub fn parse(content: &str) -> Self {
        let mut doc = IniDocument::new();
        let mut current = GENERAL_SECTION.to_string();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                match rest.strip_suffix(']') {
                    Some(name) => {
                        current = name.trim().to_string();
                        doc.section_mut(&current);
                    }
                    None => log::warn!(
                        "Skipping malformed section header on line {}: {:?}",
                        idx + 1,
                        raw
                    ),
                }
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    doc.insert(&current, key.trim(), unquote(value));
                }
                _ => log::warn!(
                    "Skipping malformed line {} in settings file: {:?}",
                    idx + 1,
                    raw
                ),
            }
        }

        doc
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    fn section_mut(&mut self, name: &str) -> &mut Section {
        let pos = match self.sections.iter().position(|s| s.name == name) {
            Some(pos) => pos,
            None => {
                self.sections.push(Section {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        &mut self.sections[pos]
    }

    fn insert(&mut self, section: &str, key: &str, value: String) {
        let section = self.section_mut(section);
        match section.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => section.entries.push((key.to_string(), value)),
        }
    }

    /// Look up a `Group/Key` value
    pub fn get(&self, key: &str) -> Option<&str> {
        let (group, name) = split_key(key);
        self.section(group)?
            .entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a value, returning `default` when absent
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Look up an integer value. Absent or unparseable values yield `default`.
    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Look up a boolean value (`true`/`false`, `1`/`0`).
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "true" || v == "1" => true,
            Some(v) if v == "false" || v == "0" => false,
            _ => default,
        }
    }

    /// Set a `Group/Key` value, creating the section if needed
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let (group, name) = split_key(key);
        self.insert(group, name, value.into());
    }

    /// Remove a `Group/Key` value; returns the previous value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let (group, name) = split_key(key);
        let section = self.sections.iter_mut().find(|s| s.name == group)?;
        let pos = section.entries.iter().position(|(k, _)| k == name)?;
        Some(section.entries.remove(pos).1)
    }

    /// Names of all sections except the implicit `[General]` one
    pub fn child_groups(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| s.name != GENERAL_SECTION)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Render the document back to INI text
    pub fn to_ini_string(&self) -> String {
        let mut out = String::new();
        for section in self.sections.iter().filter(|s| !s.entries.is_empty()) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("[{}]\n", section.name));
            for (key, value) in &section.entries {
                out.push_str(&format!("{}={}\n", key, quote_if_needed(value)));
            }
        }
        out
    }
}

/// An INI document bound to a file path.
#[derive(Debug, Clone)]
pub struct IniFile {
    path: PathBuf,
    doc: IniDocument,
}

impl IniFile {
    /// Load a settings file. A missing file yields an empty document so
    /// callers can treat "never written" and "empty" alike.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.exists() {
            log::debug!("Settings file {:?} does not exist, starting empty", path);
            return Ok(Self {
                path,
                doc: IniDocument::new(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let doc = IniDocument::parse(&contents);
        Ok(Self { path, doc })
    }

    /// Path this file is bound to
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &IniDocument {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut IniDocument {
        &mut self.doc
    }

    /// Write the document back to disk.
    ///
    /// Writes to a `.tmp` sibling and renames it over the target so a crash
    /// never leaves a half-written settings file behind.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        fs::write(&temp_path, self.doc.to_ini_string()).map_err(|source| ConfigError::Write {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}
