//! Global application settings shared by every profile.
//!
//! The dialog never touches the settings file directly; it is handed a
//! [`SettingsAccess`] implementation at construction time.

use crate::error::ConfigError;
use crate::ini::IniFile;
use std::path::PathBuf;

/// Key holding the settings-file name of the last accepted profile
pub const LAST_PROFILE_KEY: &str = "LastProfile";
/// Key set once the user dismisses the password description panel
pub const HIDE_DESCRIPTION_KEY: &str = "HidePasswordDescription";

/// Read/write access to the global application settings.
pub trait SettingsAccess {
    /// Settings-file name of the last accepted profile, empty when unset
    fn last_profile(&self) -> String;

    /// Persist the last accepted profile
    fn set_last_profile(&mut self, file_name: &str) -> Result<(), ConfigError>;

    /// Whether the password description panel has been dismissed
    fn hide_password_description(&self) -> bool;

    /// Persist the description panel flag
    fn set_hide_password_description(&mut self, hide: bool) -> Result<(), ConfigError>;
}

/// [`SettingsAccess`] backed by the `trade-gate.cfg` INI file.
///
/// Every setter reloads the file before writing so values written by other
/// parts of the client in the meantime are not clobbered.
#[derive(Debug, Clone)]
pub struct IniAppSettings {
    file: IniFile,
}

impl IniAppSettings {
    /// Open the settings file; a missing file behaves as empty
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            file: IniFile::load(path)?,
        })
    }

    fn update(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        let mut fresh = IniFile::load(self.file.path().to_path_buf())?;
        fresh.document_mut().set(key, value);
        fresh.save()?;
        self.file = fresh;
        Ok(())
    }
}

impl SettingsAccess for IniAppSettings {
    fn last_profile(&self) -> String {
        self.file
            .document()
            .get_or(LAST_PROFILE_KEY, "")
            .to_string()
    }

    fn set_last_profile(&mut self, file_name: &str) -> Result<(), ConfigError> {
        log::info!("Remembering last profile {}", file_name);
        self.update(LAST_PROFILE_KEY, file_name.to_string())
    }

    fn hide_password_description(&self) -> bool {
        self.file.document().get_bool(HIDE_DESCRIPTION_KEY, false)
    }

    fn set_hide_password_description(&mut self, hide: bool) -> Result<(), ConfigError> {
        self.update(HIDE_DESCRIPTION_KEY, hide.to_string())
    }
}
