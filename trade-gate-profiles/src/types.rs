//! Profile settings record.

use trade_gate_config::IniDocument;

/// `[Profile]` display name
pub const NAME_KEY: &str = "Profile/Name";
/// `[Profile]` exchange identifier
pub const EXCHANGE_ID_KEY: &str = "Profile/ExchangeId";
/// `[EncryptedData]` signature of the encrypted API key; required
pub const API_KEY_SIGN_KEY: &str = "EncryptedData/ApiKeySign";

/// Exchange id reported when the settings file carries none
pub const MISSING_EXCHANGE_ID: i64 = -1;
/// The unset/default exchange. Profiles on it own a legacy companion folder.
pub const UNSET_EXCHANGE_ID: i64 = 0;

/// The fields of a profile settings file the dialog cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    /// Settings-file name, e.g. `main.ini`; the profile's identity
    pub file_name: String,
    /// Stored display name, if any
    pub name: Option<String>,
    /// Exchange identifier
    pub exchange_id: i64,
    /// Encrypted API key signature; empty means the file is corrupted
    pub api_key_sign: String,
}

impl ProfileRecord {
    /// Create a record for a new profile
    pub fn new(file_name: impl Into<String>, exchange_id: i64, api_key_sign: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            name: None,
            exchange_id,
            api_key_sign: api_key_sign.into(),
        }
    }

    /// Builder: set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Extract a record from a parsed settings file
    pub fn from_document(file_name: &str, doc: &IniDocument) -> Self {
        Self {
            file_name: file_name.to_string(),
            name: doc.get(NAME_KEY).map(str::to_string),
            exchange_id: doc.get_i64(EXCHANGE_ID_KEY, MISSING_EXCHANGE_ID),
            api_key_sign: doc.get_or(API_KEY_SIGN_KEY, "").to_string(),
        }
    }

    /// Write this record's fields into `doc`, keeping any other keys
    pub fn apply_to(&self, doc: &mut IniDocument) {
        match &self.name {
            Some(name) => doc.set(NAME_KEY, name.clone()),
            None => {
                doc.remove(NAME_KEY);
            }
        }
        doc.set(EXCHANGE_ID_KEY, self.exchange_id.to_string());
        doc.set(API_KEY_SIGN_KEY, self.api_key_sign.clone());
    }

    /// Label shown in the profile list: stored name, else the file name
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.file_name)
    }

    /// A settings file without an API key signature cannot be unlocked
    pub fn is_corrupted(&self) -> bool {
        self.api_key_sign.is_empty()
    }

    /// Whether the profile is on the unset/default exchange
    pub fn uses_unset_exchange(&self) -> bool {
        self.exchange_id == UNSET_EXCHANGE_ID
    }
}
