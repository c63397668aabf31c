//! Configuration system for the trade-gate unlock dialog.
//!
//! This crate provides:
//!
//! - An INI codec for profile and application settings files
//! - Platform path resolution (data dir, script folder, lock dir, resources)
//! - Injected access to the global application settings
//! - Translated string lookup with built-in defaults

pub mod app_settings;
pub mod error;
pub mod ini;
pub mod paths;
pub mod translator;

pub use app_settings::{HIDE_DESCRIPTION_KEY, IniAppSettings, LAST_PROFILE_KEY, SettingsAccess};
pub use error::ConfigError;
pub use ini::{GENERAL_SECTION, IniDocument, IniFile};
pub use paths::{
    APP_SETTINGS_FILE, AppPaths, DEFAULT_PROFILE_FILE, LOCK_FILE_PREFIX, PROFILE_EXTENSION,
    profile_stem,
};
pub use translator::Translator;
