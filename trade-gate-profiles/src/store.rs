//! Profile storage interface.
//!
//! The unlock dialog performs every file-system effect through
//! [`ProfileStore`], so its logic can be driven by an in-memory store in
//! tests. [`FsProfileStore`] is the real implementation over the
//! application data directory.

use crate::delete::{DeletionReport, delete_profile};
use crate::error::ProfileError;
use crate::lock::{ProfileLock, is_profile_locked};
use crate::migrate::{MigrationReport, migrate_legacy_scripts};
use crate::types::ProfileRecord;
use std::fs;
use std::path::{Path, PathBuf};
use trade_gate_config::{AppPaths, IniFile, PROFILE_EXTENSION};

/// List, read, write, delete and lock-check profile settings files.
pub trait ProfileStore {
    /// Settings-file names of every stored profile, sorted by name
    fn list(&self) -> Result<Vec<String>, ProfileError>;

    /// Read one profile settings file
    fn read(&self, file_name: &str) -> Result<ProfileRecord, ProfileError>;

    /// Create or update a profile settings file
    fn write(&mut self, record: &ProfileRecord) -> Result<(), ProfileError>;

    /// Remove only the settings file (used for corrupted profiles)
    fn remove_settings(&mut self, file_name: &str) -> Result<(), ProfileError>;

    /// Remove the profile with all of its companion data, best effort
    fn delete(&mut self, file_name: &str) -> DeletionReport;

    /// Whether another instance holds the profile
    fn is_locked(&self, file_name: &str) -> bool;

    /// Move legacy shared scripts into each listed profile's folder, best effort
    fn migrate_legacy_scripts(&mut self, profile_files: &[String]) -> MigrationReport;

    /// Absolute settings path for a profile file name
    fn settings_path(&self, file_name: &str) -> PathBuf;

    /// Settings path used when no real profile is selected
    fn default_settings_path(&self) -> PathBuf;
}

/// [`ProfileStore`] over the application data directory.
#[derive(Debug, Clone)]
pub struct FsProfileStore {
    paths: AppPaths,
}

impl FsProfileStore {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Take the lock marker for a profile on behalf of this process
    pub fn acquire_lock(&self, file_name: &str) -> Result<ProfileLock, ProfileError> {
        ProfileLock::acquire(&self.paths, file_name)
    }
}

fn is_profile_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(PROFILE_EXTENSION))
}

impl ProfileStore for FsProfileStore {
    fn list(&self) -> Result<Vec<String>, ProfileError> {
        let dir = &self.paths.data_dir;
        if !dir.exists() {
            log::debug!("Data directory {:?} does not exist yet", dir);
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(dir).map_err(|source| ProfileError::Io {
            path: dir.clone(),
            source,
        })?;
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_profile_file(p))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }

    fn read(&self, file_name: &str) -> Result<ProfileRecord, ProfileError> {
        let path = self.paths.profile_path(file_name);
        if !path.exists() {
            return Err(ProfileError::NotFound(file_name.to_string()));
        }
        let file = IniFile::load(path)?;
        Ok(ProfileRecord::from_document(file_name, file.document()))
    }

    fn write(&mut self, record: &ProfileRecord) -> Result<(), ProfileError> {
        let mut file = IniFile::load(self.paths.profile_path(&record.file_name))?;
        record.apply_to(file.document_mut());
        file.save()?;
        log::info!("Saved profile settings {}", record.file_name);
        Ok(())
    }

    fn remove_settings(&mut self, file_name: &str) -> Result<(), ProfileError> {
        let path = self.paths.profile_path(file_name);
        fs::remove_file(&path).map_err(|source| ProfileError::Io { path, source })
    }

    fn delete(&mut self, file_name: &str) -> DeletionReport {
        delete_profile(&self.paths, file_name)
    }

    fn is_locked(&self, file_name: &str) -> bool {
        is_profile_locked(&self.paths, file_name)
    }

    fn migrate_legacy_scripts(&mut self, profile_files: &[String]) -> MigrationReport {
        migrate_legacy_scripts(&self.paths, profile_files)
    }

    fn settings_path(&self, file_name: &str) -> PathBuf {
        self.paths.profile_path(file_name)
    }

    fn default_settings_path(&self) -> PathBuf {
        self.paths.default_profile_path()
    }
}
