//! Password dialog state definitions and profile management methods.

use crate::exchange_list::ExchangeLogos;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use trade_gate_config::{DEFAULT_PROFILE_FILE, SettingsAccess, Translator};
use trade_gate_profiles::{ProfileError, ProfileStore};

use crate::time_sync::TimeSync;

/// Errors that keep the dialog from opening
#[derive(Debug, Error)]
pub enum DialogError {
    /// The profile directory could not be listed
    #[error("failed to list profiles: {0}")]
    Profiles(#[from] ProfileError),
}

/// How the dialog was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    Accepted,
    Rejected,
}

/// Lifecycle of the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    /// Constructed, profiles not scanned yet
    Unopened,
    /// Profiles listed, no user input yet
    Populated,
    /// User is choosing a profile or typing the password
    Selecting,
    /// "Add new profile" was chosen
    CreatingNew,
    /// Waiting for the delete confirmation answer
    Deleting,
    /// Closed; no further transitions
    Closed(DialogResult),
}

/// One row of the profile selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    /// Stored display name or file name
    pub label: String,
    /// Exchange logo, or the unknown-exchange icon
    pub icon: PathBuf,
    /// Settings-file name; `None` for the synthetic default entry
    pub file_name: Option<String>,
    pub exchange_id: i64,
    /// Another instance has the profile open
    pub locked: bool,
}

impl ProfileEntry {
    pub fn is_synthetic(&self) -> bool {
        self.file_name.is_none()
    }
}

/// What the caller gets back once the dialog closes
#[derive(Clone, PartialEq, Eq)]
pub struct DialogOutcome {
    pub result: DialogResult,
    /// Password as typed; the caller hands it to the key decryptor
    pub password: String,
    /// Settings file of the chosen profile
    pub ini_path: PathBuf,
    /// The user asked to create a new profile
    pub new_profile: bool,
    /// The selected profile was deleted
    pub reset_data: bool,
}

impl fmt::Debug for DialogOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogOutcome")
            .field("result", &self.result)
            .field("password", &"<redacted>")
            .field("ini_path", &self.ini_path)
            .field("new_profile", &self.new_profile)
            .field("reset_data", &self.reset_data)
            .finish()
    }
}

/// Pick the initial selection: the last-used profile if it is unlocked,
/// else the first unlocked profile, else the synthetic default entry when it
/// is the only one. With every real profile locked nothing is selected.
pub fn select_default_index(entries: &[ProfileEntry], last_profile: &str) -> Option<usize> {
    let unlocked_real = |e: &ProfileEntry| !e.locked && e.file_name.is_some();

    entries
        .iter()
        .position(|e| unlocked_real(e) && e.file_name.as_deref() == Some(last_profile))
        .or_else(|| entries.iter().position(unlocked_real))
        .or_else(|| match entries {
            [only] if only.is_synthetic() => Some(0),
            _ => None,
        })
}

/// Password dialog state
pub struct PasswordDialog {
    pub(super) phase: DialogPhase,
    pub(super) store: Box<dyn ProfileStore>,
    pub(super) settings: Box<dyn SettingsAccess>,
    pub(super) logos: ExchangeLogos,
    pub(super) translator: Translator,
    pub(super) version: String,

    pub(super) entries: Vec<ProfileEntry>,
    pub(super) selected: Option<usize>,
    pub(super) password: String,
    pub(super) description_visible: bool,

    /// Entry awaiting delete confirmation
    pub(super) pending_delete: Option<usize>,
    pub(super) new_profile: bool,
    pub(super) reset_data: bool,

    /// Warnings queued by the time-sync callback
    pub(super) time_warnings: Arc<Mutex<VecDeque<String>>>,
    /// Warning currently shown in the alert
    pub(super) active_time_warning: Option<String>,
}

impl PasswordDialog {
    /// Create an unopened dialog
    pub fn new(
        store: Box<dyn ProfileStore>,
        settings: Box<dyn SettingsAccess>,
        logos: ExchangeLogos,
        translator: Translator,
        version: impl Into<String>,
    ) -> Self {
        Self {
            phase: DialogPhase::Unopened,
            store,
            settings,
            logos,
            translator,
            version: version.into(),
            entries: Vec::new(),
            selected: None,
            password: String::new(),
            description_visible: true,
            pending_delete: None,
            new_profile: false,
            reset_data: false,
            time_warnings: Arc::new(Mutex::new(VecDeque::new())),
            active_time_warning: None,
        }
    }

    /// Create and populate in one step
    pub fn open(
        store: Box<dyn ProfileStore>,
        settings: Box<dyn SettingsAccess>,
        logos: ExchangeLogos,
        translator: Translator,
        version: impl Into<String>,
    ) -> Result<Self, DialogError> {
        let mut dialog = Self::new(store, settings, logos, translator, version);
        dialog.populate()?;
        Ok(dialog)
    }

    /// Scan stored profiles, drop corrupted ones, migrate legacy scripts and
    /// choose the initial selection.
    pub fn populate(&mut self) -> Result<(), DialogError> {
        if self.phase != DialogPhase::Unopened {
            log::debug!("populate ignored in phase {:?}", self.phase);
            return Ok(());
        }

        let last_profile = self.settings.last_profile();
        let mut entries = Vec::new();
        let mut valid_files = Vec::new();

        for file_name in self.store.list()? {
            let record = match self.store.read(&file_name) {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Skipping unreadable profile {}: {}", file_name, e);
                    continue;
                }
            };

            if record.is_corrupted() {
                log::debug!("Removing corrupted profile {} (no key signature)", file_name);
                if let Err(e) = self.store.remove_settings(&file_name) {
                    log::warn!("Failed to remove corrupted profile {}: {}", file_name, e);
                }
                continue;
            }

            entries.push(ProfileEntry {
                label: record.display_name().to_string(),
                icon: self.logos.resolve_icon(record.exchange_id),
                locked: self.store.is_locked(&file_name),
                exchange_id: record.exchange_id,
                file_name: Some(file_name.clone()),
            });
            valid_files.push(file_name);
        }

        let report = self.store.migrate_legacy_scripts(&valid_files);
        if !report.is_empty() {
            log::info!(
                "Moved {} legacy script(s) into profile folders",
                report.removed
            );
        }

        if entries.is_empty() {
            entries.push(ProfileEntry {
                label: self
                    .translator
                    .tr("DEFAULT_PROFILE_NAME", "Default Profile"),
                icon: self.logos.resolve_icon(trade_gate_profiles::MISSING_EXCHANGE_ID),
                file_name: None,
                exchange_id: trade_gate_profiles::MISSING_EXCHANGE_ID,
                locked: false,
            });
        }

        self.selected = select_default_index(&entries, &last_profile);
        self.entries = entries;
        self.description_visible = !self.settings.hide_password_description();
        self.phase = DialogPhase::Populated;

        log::info!(
            "Password dialog opened with {} profile(s), selected {:?}",
            self.entries.len(),
            self.selected
        );
        Ok(())
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.phase, DialogPhase::Closed(_))
    }

    /// Whether the dialog accepts user input in its current phase
    fn is_interactive(&self) -> bool {
        matches!(self.phase, DialogPhase::Populated | DialogPhase::Selecting)
    }

    pub fn entries(&self) -> &[ProfileEntry] {
        &self.entries
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&ProfileEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    /// Change the selected profile; locked profiles cannot be selected
    pub fn select(&mut self, index: usize) {
        if !self.is_interactive() || self.entries.get(index).is_none_or(|e| e.locked) {
            return;
        }
        self.selected = Some(index);
        self.phase = DialogPhase::Selecting;
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Update the password text
    pub fn set_password(&mut self, password: impl Into<String>) {
        if !self.is_interactive() {
            return;
        }
        self.password = password.into();
        self.phase = DialogPhase::Selecting;
    }

    /// The confirm button is enabled only for a non-empty password
    pub fn can_confirm(&self) -> bool {
        !self.password.is_empty()
    }

    /// Settings file the caller should open for the current selection
    pub fn ini_file_path(&self) -> PathBuf {
        match self.selected_entry().and_then(|e| e.file_name.as_deref()) {
            Some(file_name) => self.store.settings_path(file_name),
            None => self.store.default_settings_path(),
        }
    }

    /// Confirm button: accept when a password has been entered.
    ///
    /// Returns whether the dialog closed.
    pub fn confirm(&mut self) -> bool {
        if !self.is_interactive() || !self.can_confirm() {
            return false;
        }
        self.accept();
        true
    }

    /// Remember the selected profile and close as accepted
    pub(super) fn accept(&mut self) {
        if let Some(file_name) = self.selected_entry().and_then(|e| e.file_name.clone()) {
            if let Err(e) = self.settings.set_last_profile(&file_name) {
                log::warn!("Failed to remember last profile {}: {}", file_name, e);
            }
        }
        self.phase = DialogPhase::Closed(DialogResult::Accepted);
    }

    /// Close without unlocking
    pub fn reject(&mut self) {
        if self.is_closed() {
            return;
        }
        self.pending_delete = None;
        self.phase = DialogPhase::Closed(DialogResult::Rejected);
    }

    /// "Add new profile": record the intent and accept
    pub fn add_new_profile(&mut self) {
        if !self.is_interactive() {
            return;
        }
        self.new_profile = true;
        self.phase = DialogPhase::CreatingNew;
        log::info!("New profile requested");
        self.accept();
    }

    pub fn is_new_profile(&self) -> bool {
        self.new_profile
    }

    pub fn is_reset_data(&self) -> bool {
        self.reset_data
    }

    /// Ask for confirmation before deleting the selected profile
    pub fn request_delete(&mut self) {
        if !self.is_interactive() {
            return;
        }
        if let Some(index) = self.selected {
            self.pending_delete = Some(index);
            self.phase = DialogPhase::Deleting;
        }
    }

    /// Text of the delete confirmation prompt
    pub fn delete_prompt(&self) -> Option<String> {
        let entry = self.entries.get(self.pending_delete?)?;
        Some(self.translator.tr_arg(
            "CONFIRM_DELETE_PROFILE",
            "Are you sure to delete \"%1\" profile?",
            &entry.label,
        ))
    }

    /// "Yes" on the delete prompt: remove the profile's data and accept
    pub fn confirm_delete(&mut self) {
        if self.phase != DialogPhase::Deleting {
            return;
        }
        let Some(index) = self.pending_delete.take() else {
            return;
        };
        let file_name = self
            .entries
            .get(index)
            .and_then(|e| e.file_name.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE_FILE.to_string());

        self.reset_data = true;
        let report = self.store.delete(&file_name);
        if !report.removed_any() {
            log::debug!("Nothing removed for profile {}", file_name);
        }
        self.accept();
    }

    /// "No" on the delete prompt
    pub fn cancel_delete(&mut self) {
        if self.phase == DialogPhase::Deleting {
            self.pending_delete = None;
            self.phase = DialogPhase::Selecting;
        }
    }

    pub fn description_visible(&self) -> bool {
        self.description_visible
    }

    /// Hide the password description panel for good
    pub fn dismiss_description(&mut self) {
        self.description_visible = false;
        if let Err(e) = self.settings.set_hide_password_description(true) {
            log::warn!("Failed to persist description preference: {}", e);
        }
    }

    /// Subscribe to time-sync warnings
    pub fn attach_time_sync(&self, time_sync: &TimeSync) {
        let queue = Arc::clone(&self.time_warnings);
        time_sync.on_warning(move |message| queue.lock().push_back(message.to_string()));
    }

    /// Queue a time warning directly
    pub fn push_time_warning(&self, message: impl Into<String>) {
        self.time_warnings.lock().push_back(message.into());
    }

    /// Warning to show now, pulling the next queued one if none is active
    pub fn active_time_warning(&mut self) -> Option<&str> {
        if self.active_time_warning.is_none() {
            self.active_time_warning = self.time_warnings.lock().pop_front();
        }
        self.active_time_warning.as_deref()
    }

    /// Close the current time warning alert
    pub fn dismiss_time_warning(&mut self) {
        self.active_time_warning = None;
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Window title including the client version
    pub fn window_title(&self) -> String {
        format!(
            "{} v{}",
            self.translator.tr("PASSWORD_DIALOG_TITLE", "Enter Password"),
            self.version
        )
    }

    /// Outcome, available once the dialog has closed
    pub fn outcome(&self) -> Option<DialogOutcome> {
        let DialogPhase::Closed(result) = self.phase else {
            return None;
        };
        Some(DialogOutcome {
            result,
            password: self.password.clone(),
            ini_path: self.ini_file_path(),
            new_profile: self.new_profile,
            reset_data: self.reset_data,
        })
    }
}
