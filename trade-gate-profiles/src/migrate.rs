//! Move old-format scripts from the shared script folder into per-profile
//! folders.
//!
//! Older clients kept every `*.JLR`/`*.JLS` file directly in the script
//! folder. Each profile now owns `<script folder>/<profile stem>/`. Every
//! step is best effort: failures are logged and the migration moves on.

use std::fs;
use std::path::{Path, PathBuf};
use trade_gate_config::AppPaths;

/// Extensions of legacy automation scripts
pub const LEGACY_SCRIPT_EXTENSIONS: &[&str] = &["JLR", "JLS"];

/// What a migration pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Legacy scripts found in the shared folder
    pub scripts: Vec<String>,
    /// Profile script folders that received copies
    pub profile_dirs: Vec<PathBuf>,
    /// Number of originals removed from the shared folder
    pub removed: usize,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

/// Whether `path` has one of the legacy script extensions
pub fn is_legacy_script(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            LEGACY_SCRIPT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// File names of legacy scripts directly inside `dir`, sorted
pub fn list_legacy_scripts(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut scripts: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_legacy_script(path))
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    scripts.sort();
    scripts
}

/// Copy every legacy script into each profile's script folder, then delete
/// the originals.
///
/// Nothing happens unless there is at least one script and one profile.
pub fn migrate_legacy_scripts(paths: &AppPaths, profile_files: &[String]) -> MigrationReport {
    let scripts = list_legacy_scripts(&paths.script_dir);
    let mut report = MigrationReport {
        scripts,
        ..Default::default()
    };
    if report.scripts.is_empty() || profile_files.is_empty() {
        return report;
    }

    log::info!(
        "Migrating {} legacy script(s) into {} profile folder(s)",
        report.scripts.len(),
        profile_files.len()
    );

    for file_name in profile_files {
        let target_dir = paths.profile_script_dir(file_name);
        if let Err(e) = fs::create_dir_all(&target_dir) {
            log::warn!("Failed to create script folder {:?}: {}", target_dir, e);
            continue;
        }

        for script in &report.scripts {
            let from = paths.script_dir.join(script);
            let to = target_dir.join(script);
            if to.exists() {
                log::debug!("Script {:?} already present, keeping existing copy", to);
                continue;
            }
            if let Err(e) = fs::copy(&from, &to) {
                log::warn!("Failed to copy {:?} to {:?}: {}", from, to, e);
            }
        }
        report.profile_dirs.push(target_dir);
    }

    for script in &report.scripts {
        let original = paths.script_dir.join(script);
        match fs::remove_file(&original) {
            Ok(()) => report.removed += 1,
            Err(e) => log::warn!("Failed to remove legacy script {:?}: {}", original, e),
        }
    }

    report
}
