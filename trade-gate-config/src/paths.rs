//! Filesystem locations used by the unlock dialog.
//!
//! Defaults follow the platform conventions resolved by `dirs`; every path
//! can be overridden so tests and portable installs can point elsewhere.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Directory name under the platform data dir
pub const APP_DIR_NAME: &str = "trade-gate";
/// Global application settings file (last profile, UI flags)
pub const APP_SETTINGS_FILE: &str = "trade-gate.cfg";
/// Settings file used when no profile exists yet
pub const DEFAULT_PROFILE_FILE: &str = "default.ini";
/// Extension of per-profile settings files
pub const PROFILE_EXTENSION: &str = "ini";
/// Sub-directory holding automation scripts
pub const SCRIPTS_DIR_NAME: &str = "Scripts";
/// Prefix of lock marker files in the temp directory
pub const LOCK_FILE_PREFIX: &str = "trade_gate_lock_";

/// Resolved application paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Directory containing profile `*.ini` files and the app settings file
    pub data_dir: PathBuf,
    /// Shared script folder; each profile gets `<script_dir>/<profile stem>/`
    pub script_dir: PathBuf,
    /// Directory where lock markers are created
    pub temp_dir: PathBuf,
    /// Bundled resources (exchange list, logos, translations)
    pub resource_dir: PathBuf,
}

impl AppPaths {
    /// Resolve platform defaults.
    ///
    /// `data_dir` is `dirs::data_dir()/trade-gate`; resources live in a
    /// `resources/` folder beside the executable, falling back to the
    /// current directory when the executable path is unknown.
    pub fn resolve() -> Result<Self, ConfigError> {
        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::DataDirUnavailable)?
            .join(APP_DIR_NAME);
        let resource_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("resources")))
            .unwrap_or_else(|| PathBuf::from("resources"));
        Ok(Self::with_data_dir(data_dir, resource_dir))
    }

    /// Build paths rooted at an explicit data directory
    pub fn with_data_dir(data_dir: impl Into<PathBuf>, resource_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            script_dir: data_dir.join(SCRIPTS_DIR_NAME),
            data_dir,
            temp_dir: std::env::temp_dir(),
            resource_dir: resource_dir.into(),
        }
    }

    /// Override the lock-marker directory
    pub fn temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    /// Global app settings file
    pub fn app_settings_path(&self) -> PathBuf {
        self.data_dir.join(APP_SETTINGS_FILE)
    }

    /// Full path of a profile settings file given its file name
    pub fn profile_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    /// Settings path used when the synthetic default entry is chosen
    pub fn default_profile_path(&self) -> PathBuf {
        self.data_dir.join(DEFAULT_PROFILE_FILE)
    }

    /// Per-profile script folder (`<script_dir>/<stem>`)
    pub fn profile_script_dir(&self, file_name: &str) -> PathBuf {
        self.script_dir.join(profile_stem(file_name))
    }

    /// Bundled exchange list
    pub fn exchange_list_path(&self) -> PathBuf {
        self.resource_dir.join("Exchanges").join("List.ini")
    }

    /// Directory holding exchange logos
    pub fn logos_dir(&self) -> PathBuf {
        self.resource_dir.join("Exchanges").join("Logos")
    }

    /// Fallback icon for profiles whose exchange has no logo
    pub fn unknown_logo_path(&self) -> PathBuf {
        self.logos_dir().join("Unknown.png")
    }

    /// Language file for a locale code, e.g. `resources/Language/en.lng`
    pub fn language_path(&self, locale: &str) -> PathBuf {
        self.resource_dir
            .join("Language")
            .join(format!("{locale}.lng"))
    }
}

/// File name without its final extension (`main.ini` -> `main`,
/// `a.b.ini` -> `a.b`).
pub fn profile_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}
