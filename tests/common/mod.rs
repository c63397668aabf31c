//! Shared integration test helpers for trade-gate.
//!
//! Provides in-memory implementations of the dialog's injected
//! collaborators plus factories for temp-dir based setups.
//!
//! ```ignore
//! mod common;
//! use common::{MemoryProfileStore, MemorySettings};
//! ```
//!
//! The in-memory types share their state through `Arc`, so a test keeps a
//! clone to inspect what the dialog did after handing the other clone over
//! as a `Box<dyn ...>`.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use trade_gate::exchange_list::{ExchangeLogos, compute_digest, digest_path};
use trade_gate::password_dialog::PasswordDialog;
use trade_gate_config::{
    AppPaths, ConfigError, DEFAULT_PROFILE_FILE, IniDocument, SettingsAccess, Translator,
};
use trade_gate_profiles::{
    DeletionReport, MigrationReport, ProfileError, ProfileRecord, ProfileStore,
};

pub const DATA_DIR: &str = "/profiles";

#[derive(Debug, Default)]
pub struct StoreState {
    pub profiles: BTreeMap<String, ProfileRecord>,
    pub locked: BTreeSet<String>,
    pub removed_settings: Vec<String>,
    pub deleted: Vec<String>,
    pub migrated: Vec<Vec<String>>,
}

/// [`ProfileStore`] backed by a map
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    pub state: Arc<Mutex<StoreState>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, record: ProfileRecord) -> Self {
        self.state
            .lock()
            .profiles
            .insert(record.file_name.clone(), record);
        self
    }

    pub fn lock(self, file_name: &str) -> Self {
        self.state.lock().locked.insert(file_name.to_string());
        self
    }

    pub fn file_names(&self) -> Vec<String> {
        self.state.lock().profiles.keys().cloned().collect()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn list(&self) -> Result<Vec<String>, ProfileError> {
        Ok(self.file_names())
    }

    fn read(&self, file_name: &str) -> Result<ProfileRecord, ProfileError> {
        self.state
            .lock()
            .profiles
            .get(file_name)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound(file_name.to_string()))
    }

    fn write(&mut self, record: &ProfileRecord) -> Result<(), ProfileError> {
        self.state
            .lock()
            .profiles
            .insert(record.file_name.clone(), record.clone());
        Ok(())
    }

    fn remove_settings(&mut self, file_name: &str) -> Result<(), ProfileError> {
        let mut state = self.state.lock();
        state
            .profiles
            .remove(file_name)
            .ok_or_else(|| ProfileError::NotFound(file_name.to_string()))?;
        state.removed_settings.push(file_name.to_string());
        Ok(())
    }

    fn delete(&mut self, file_name: &str) -> DeletionReport {
        let mut state = self.state.lock();
        state.deleted.push(file_name.to_string());
        let mut report = DeletionReport::default();
        if state.profiles.remove(file_name).is_some() {
            report.removed.push(self.settings_path(file_name));
        }
        report
    }

    fn is_locked(&self, file_name: &str) -> bool {
        self.state.lock().locked.contains(file_name)
    }

    fn migrate_legacy_scripts(&mut self, profile_files: &[String]) -> MigrationReport {
        self.state.lock().migrated.push(profile_files.to_vec());
        MigrationReport::default()
    }

    fn settings_path(&self, file_name: &str) -> PathBuf {
        Path::new(DATA_DIR).join(file_name)
    }

    fn default_settings_path(&self) -> PathBuf {
        Path::new(DATA_DIR).join(DEFAULT_PROFILE_FILE)
    }
}

#[derive(Debug, Default)]
pub struct SettingsState {
    pub last_profile: String,
    pub hide_description: bool,
    /// Make every write fail
    pub read_only: bool,
    pub writes: usize,
}

/// [`SettingsAccess`] backed by shared fields
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    pub state: Arc<Mutex<SettingsState>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_profile(self, file_name: &str) -> Self {
        self.state.lock().last_profile = file_name.to_string();
        self
    }

    pub fn hide_description(self) -> Self {
        self.state.lock().hide_description = true;
        self
    }

    pub fn read_only(self) -> Self {
        self.state.lock().read_only = true;
        self
    }

    fn write_check(&self) -> Result<(), ConfigError> {
        let mut state = self.state.lock();
        if state.read_only {
            return Err(ConfigError::Write {
                path: PathBuf::from("memory"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        state.writes += 1;
        Ok(())
    }
}

impl SettingsAccess for MemorySettings {
    fn last_profile(&self) -> String {
        self.state.lock().last_profile.clone()
    }

    fn set_last_profile(&mut self, file_name: &str) -> Result<(), ConfigError> {
        self.write_check()?;
        self.state.lock().last_profile = file_name.to_string();
        Ok(())
    }

    fn hide_password_description(&self) -> bool {
        self.state.lock().hide_description
    }

    fn set_hide_password_description(&mut self, hide: bool) -> Result<(), ConfigError> {
        self.write_check()?;
        self.state.lock().hide_description = hide;
        Ok(())
    }
}

/// Valid profile on exchange `exchange_id`
pub fn profile(file_name: &str, name: &str, exchange_id: i64) -> ProfileRecord {
    ProfileRecord::new(file_name, exchange_id, "c2lnbmF0dXJl").name(name)
}

/// Profile missing its API key signature
pub fn corrupted_profile(file_name: &str) -> ProfileRecord {
    ProfileRecord::new(file_name, 1, "")
}

/// Logo map where exchange 1 has a logo and everything else falls back
pub fn test_logos() -> ExchangeLogos {
    let doc = IniDocument::parse("[1]\nLogo=one.png\n");
    ExchangeLogos::from_document(&doc, Path::new("/logos"), PathBuf::from("/logos/Unknown.png"))
}

/// Populated dialog over in-memory collaborators
pub fn open_dialog(store: &MemoryProfileStore, settings: &MemorySettings) -> PasswordDialog {
    PasswordDialog::open(
        Box::new(store.clone()),
        Box::new(settings.clone()),
        test_logos(),
        Translator::new(),
        "1.0.0",
    )
    .expect("dialog opens over in-memory store")
}

/// Temp-dir layout with data, resources and lock directories
pub struct TestContext {
    pub temp: TempDir,
    pub paths: AppPaths,
}

impl TestContext {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = temp.path();
        let paths = AppPaths::with_data_dir(root.join("data"), root.join("resources"))
            .temp_dir(root.join("locks"));
        fs::create_dir_all(&paths.data_dir).expect("create data dir");
        fs::create_dir_all(&paths.temp_dir).expect("create lock dir");
        Self { temp, paths }
    }

    /// Write a raw settings file into the data directory
    pub fn write_profile(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.paths.profile_path(file_name);
        fs::write(&path, content).expect("write profile");
        path
    }

    /// Install an exchange list and, optionally, a matching digest
    pub fn install_exchange_list(&self, list: &str, signed: bool) -> PathBuf {
        let list_path = self.paths.exchange_list_path();
        fs::create_dir_all(self.paths.logos_dir()).expect("create logos dir");
        fs::write(&list_path, list).expect("write list");
        if signed {
            fs::write(digest_path(&list_path), compute_digest(list.as_bytes()))
                .expect("write digest");
        }
        list_path
    }
}
