//! Profile deletion.
//!
//! Removes a profile's settings file, its script folder, and for profiles on
//! the unset exchange the legacy companion folder next to the settings file.
//! Each removal is attempted on its own; failures are logged and never
//! rolled back.

use crate::migrate::is_legacy_script;
use crate::types::ProfileRecord;
use std::fs;
use std::path::{Path, PathBuf};
use trade_gate_config::{AppPaths, IniFile, PROFILE_EXTENSION};

/// Legacy per-profile config kept in the companion folder
pub const LEGACY_COMPANION_CONFIG: &str = "QtTrader.cfg";

/// Paths actually removed by [`delete_profile`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub removed: Vec<PathBuf>,
}

impl DeletionReport {
    pub fn removed_any(&self) -> bool {
        !self.removed.is_empty()
    }

    fn remove_file(&mut self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => self.removed.push(path.to_path_buf()),
            Err(e) => log::warn!("Failed to remove {:?}: {}", path, e),
        }
    }

    fn remove_dir(&mut self, path: &Path) {
        match fs::remove_dir(path) {
            Ok(()) => self.removed.push(path.to_path_buf()),
            Err(e) => log::warn!("Failed to remove directory {:?}: {}", path, e),
        }
    }
}

fn files_matching(dir: &Path, matches: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && matches(p))
        .collect();
    files.sort();
    files
}

fn has_profile_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PROFILE_EXTENSION))
}

/// Delete everything belonging to the profile stored in `file_name`.
///
/// Does nothing when the settings file is already gone.
pub fn delete_profile(paths: &AppPaths, file_name: &str) -> DeletionReport {
    let mut report = DeletionReport::default();
    let ini_path = paths.profile_path(file_name);
    if !ini_path.exists() {
        log::info!("Profile {} has no settings file, nothing to delete", file_name);
        return report;
    }

    let unset_exchange = match IniFile::load(&ini_path) {
        Ok(file) => ProfileRecord::from_document(file_name, file.document()).uses_unset_exchange(),
        Err(e) => {
            log::warn!("Could not read {:?} before deletion: {}", ini_path, e);
            false
        }
    };

    if unset_exchange {
        let companion = ini_path.with_extension("");
        if companion.is_dir() {
            let legacy_cfg = companion.join(LEGACY_COMPANION_CONFIG);
            if legacy_cfg.exists() {
                report.remove_file(&legacy_cfg);
            }
            for ini in files_matching(&companion, has_profile_extension) {
                report.remove_file(&ini);
            }
            report.remove_dir(&companion);
        }
    }

    report.remove_file(&ini_path);

    let script_dir = paths.profile_script_dir(file_name);
    if script_dir.is_dir() {
        for script in files_matching(&script_dir, is_legacy_script) {
            report.remove_file(&script);
        }
        report.remove_dir(&script_dir);
    }

    log::info!(
        "Deleted profile {} ({} path(s) removed)",
        file_name,
        report.removed.len()
    );
    report
}
