//! Tests for the password dialog state machine
//!
//! These tests drive `PasswordDialog` over in-memory collaborators:
//! - Profile enumeration, corrupted-profile removal and the synthetic entry
//! - Default selection precedence with lock state
//! - Password confirmation, new-profile and cancel paths
//! - Delete confirmation flow
//! - Description visibility and time warnings

mod common;

use common::{
    DATA_DIR, MemoryProfileStore, MemorySettings, corrupted_profile, open_dialog, profile,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use trade_gate::password_dialog::{DialogPhase, DialogResult, PasswordDialog};
use trade_gate::time_sync::{TimeSource, TimeSync, TimeSyncError};
use trade_gate_config::Translator;

// ============================================================================
// Population
// ============================================================================

#[test]
fn test_new_dialog_is_unopened() {
    let store = MemoryProfileStore::new().with(profile("a.ini", "A", 1));
    let dialog = PasswordDialog::new(
        Box::new(store.clone()),
        Box::new(MemorySettings::new()),
        common::test_logos(),
        Translator::new(),
        "1.0.0",
    );

    assert_eq!(dialog.phase(), DialogPhase::Unopened);
    assert!(dialog.entries().is_empty());
    assert!(dialog.outcome().is_none());
}

#[test]
fn test_populate_lists_profiles_in_order() {
    let store = MemoryProfileStore::new()
        .with(profile("b.ini", "Beta", 1))
        .with(profile("a.ini", "Alpha", 7));
    let dialog = open_dialog(&store, &MemorySettings::new());

    assert_eq!(dialog.phase(), DialogPhase::Populated);
    let labels: Vec<&str> = dialog.entries().iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["Alpha", "Beta"]);
    assert_eq!(dialog.entries()[0].file_name.as_deref(), Some("a.ini"));
}

#[test]
fn test_unnamed_profile_uses_file_name() {
    let store =
        MemoryProfileStore::new().with(trade_gate_profiles::ProfileRecord::new("x.ini", 1, "sig"));
    let dialog = open_dialog(&store, &MemorySettings::new());
    assert_eq!(dialog.entries()[0].label, "x.ini");
}

#[test]
fn test_icons_fall_back_to_unknown() {
    let store = MemoryProfileStore::new()
        .with(profile("a.ini", "A", 1))
        .with(profile("b.ini", "B", 42));
    let dialog = open_dialog(&store, &MemorySettings::new());

    // Logo for exchange 1 is listed but not on disk
    for entry in dialog.entries() {
        assert_eq!(entry.icon, PathBuf::from("/logos/Unknown.png"));
    }
}

#[test]
fn test_corrupted_profiles_are_removed_and_not_listed() {
    let store = MemoryProfileStore::new()
        .with(corrupted_profile("bad.ini"))
        .with(profile("good.ini", "Good", 1));
    let dialog = open_dialog(&store, &MemorySettings::new());

    assert_eq!(dialog.entries().len(), 1);
    assert_eq!(dialog.entries()[0].label, "Good");
    assert_eq!(store.state.lock().removed_settings, vec!["bad.ini"]);
    assert_eq!(store.file_names(), vec!["good.ini"]);
}

#[test]
fn test_migration_targets_only_valid_profiles() {
    let store = MemoryProfileStore::new()
        .with(corrupted_profile("bad.ini"))
        .with(profile("good.ini", "Good", 1));
    let _dialog = open_dialog(&store, &MemorySettings::new());

    assert_eq!(
        store.state.lock().migrated,
        vec![vec!["good.ini".to_string()]]
    );
}

#[test]
fn test_synthetic_entry_when_no_profiles() {
    let store = MemoryProfileStore::new();
    let dialog = open_dialog(&store, &MemorySettings::new());

    assert_eq!(dialog.entries().len(), 1);
    let entry = &dialog.entries()[0];
    assert!(entry.is_synthetic());
    assert_eq!(entry.label, "Default Profile");
    assert!(!entry.locked);
    assert_eq!(dialog.selected_index(), Some(0));
    assert_eq!(dialog.ini_file_path(), Path::new(DATA_DIR).join("default.ini"));
}

#[test]
fn test_synthetic_entry_when_all_profiles_corrupted() {
    let store = MemoryProfileStore::new().with(corrupted_profile("bad.ini"));
    let dialog = open_dialog(&store, &MemorySettings::new());

    assert_eq!(dialog.entries().len(), 1);
    assert!(dialog.entries()[0].is_synthetic());
}

#[test]
fn test_no_synthetic_entry_when_profiles_exist() {
    let store = MemoryProfileStore::new().with(profile("a.ini", "A", 1));
    let dialog = open_dialog(&store, &MemorySettings::new());
    assert!(dialog.entries().iter().all(|e| !e.is_synthetic()));
}

#[test]
fn test_synthetic_label_is_translated() {
    let dialog = PasswordDialog::open(
        Box::new(MemoryProfileStore::new()),
        Box::new(MemorySettings::new()),
        common::test_logos(),
        Translator::from_str_content("DEFAULT_PROFILE_NAME=Standardprofil\n"),
        "1.0.0",
    )
    .unwrap();
    assert_eq!(dialog.entries()[0].label, "Standardprofil");
}

#[test]
fn test_populate_twice_is_ignored() {
    let store = MemoryProfileStore::new().with(profile("a.ini", "A", 1));
    let mut dialog = open_dialog(&store, &MemorySettings::new());
    store.state.lock().profiles.clear();

    dialog.populate().unwrap();
    assert_eq!(dialog.entries().len(), 1);
}

// ============================================================================
// Default selection
// ============================================================================

#[test]
fn test_last_profile_is_selected() {
    let store = MemoryProfileStore::new()
        .with(profile("a.ini", "A", 1))
        .with(profile("b.ini", "B", 1));
    let dialog = open_dialog(&store, &MemorySettings::new().last_profile("b.ini"));

    assert_eq!(dialog.selected_index(), Some(1));
}

#[test]
fn test_locked_last_profile_falls_back_to_first_unlocked() {
    let store = MemoryProfileStore::new()
        .with(profile("a.ini", "A", 1))
        .with(profile("b.ini", "B", 1))
        .lock("a.ini");
    let dialog = open_dialog(&store, &MemorySettings::new().last_profile("a.ini"));

    assert!(dialog.entries()[0].locked);
    assert_eq!(
        dialog.selected_entry().and_then(|e| e.file_name.as_deref()),
        Some("b.ini")
    );
}

#[test]
fn test_unknown_last_profile_selects_first_unlocked() {
    let store = MemoryProfileStore::new()
        .with(profile("a.ini", "A", 1))
        .with(profile("b.ini", "B", 1))
        .with(profile("c.ini", "C", 1))
        .lock("a.ini");
    let dialog = open_dialog(&store, &MemorySettings::new().last_profile("gone.ini"));

    assert_eq!(dialog.selected_index(), Some(1));
}

#[test]
fn test_all_locked_selects_nothing() {
    let store = MemoryProfileStore::new()
        .with(profile("a.ini", "A", 1))
        .lock("a.ini");
    let dialog = open_dialog(&store, &MemorySettings::new().last_profile("a.ini"));

    assert_eq!(dialog.selected_index(), None);
    assert_eq!(dialog.ini_file_path(), Path::new(DATA_DIR).join("default.ini"));
}

#[test]
fn test_select_changes_selection_and_skips_locked() {
    let store = MemoryProfileStore::new()
        .with(profile("a.ini", "A", 1))
        .with(profile("b.ini", "B", 1))
        .with(profile("c.ini", "C", 1))
        .lock("b.ini");
    let mut dialog = open_dialog(&store, &MemorySettings::new());

    dialog.select(2);
    assert_eq!(dialog.selected_index(), Some(2));
    assert_eq!(dialog.phase(), DialogPhase::Selecting);
    assert_eq!(dialog.ini_file_path(), Path::new(DATA_DIR).join("c.ini"));

    dialog.select(1);
    assert_eq!(dialog.selected_index(), Some(2));
    dialog.select(99);
    assert_eq!(dialog.selected_index(), Some(2));
}

// ============================================================================
// Confirmation
// ============================================================================

#[test]
fn test_confirm_requires_password() {
    let store = MemoryProfileStore::new().with(profile("a.ini", "A", 1));
    let mut dialog = open_dialog(&store, &MemorySettings::new());

    assert!(!dialog.can_confirm());
    assert!(!dialog.confirm());
    assert!(!dialog.is_closed());

    dialog.set_password("x");
    assert!(dialog.can_confirm());
    dialog.set_password("");
    assert!(!dialog.can_confirm());
}

#[test]
fn test_confirm_accepts_and_remembers_profile() {
    let store = MemoryProfileStore::new()
        .with(profile("a.ini", "A", 1))
        .with(profile("b.ini", "B", 1));
    let settings = MemorySettings::new();
    let mut dialog = open_dialog(&store, &settings);

    dialog.select(1);
    dialog.set_password("secret");
    assert!(dialog.confirm());

    assert_eq!(dialog.phase(), DialogPhase::Closed(DialogResult::Accepted));
    assert_eq!(settings.state.lock().last_profile, "b.ini");

    let outcome = dialog.outcome().unwrap();
    assert_eq!(outcome.result, DialogResult::Accepted);
    assert_eq!(outcome.password, "secret");
    assert_eq!(outcome.ini_path, Path::new(DATA_DIR).join("b.ini"));
    assert!(!outcome.new_profile);
    assert!(!outcome.reset_data);
}

#[test]
fn test_accept_with_synthetic_entry_keeps_last_profile() {
    let settings = MemorySettings::new().last_profile("old.ini");
    let mut dialog = open_dialog(&MemoryProfileStore::new(), &settings);

    dialog.set_password("pw");
    assert!(dialog.confirm());
    assert_eq!(settings.state.lock().last_profile, "old.ini");
}

#[test]
fn test_settings_write_failure_still_accepts() {
    let store = MemoryProfileStore::new().with(profile("a.ini", "A", 1));
    let mut dialog = open_dialog(&store, &MemorySettings::new().read_only());

    dialog.set_password("pw");
    assert!(dialog.confirm());
    assert_eq!(dialog.phase(), DialogPhase::Closed(DialogResult::Accepted));
}

#[test]
fn test_add_new_profile_accepts_with_flag() {
    let store = MemoryProfileStore::new().with(profile("a.ini", "A", 1));
    let mut dialog = open_dialog(&store, &MemorySettings::new());

    dialog.add_new_profile();

    let outcome = dialog.outcome().unwrap();
    assert_eq!(outcome.result, DialogResult::Accepted);
    assert!(outcome.new_profile);
    assert!(dialog.is_new_profile());
}

#[test]
fn test_reject() {
    let store = MemoryProfileStore::new().with(profile("a.ini", "A", 1));
    let settings = MemorySettings::new();
    let mut dialog = open_dialog(&store, &settings);

    dialog.set_password("typed");
    dialog.reject();

    assert_eq!(dialog.outcome().unwrap().result, DialogResult::Rejected);
    assert_eq!(settings.state.lock().writes, 0);
}

#[test]
fn test_closed_dialog_ignores_further_input() {
    let store = MemoryProfileStore::new()
        .with(profile("a.ini", "A", 1))
        .with(profile("b.ini", "B", 1));
    let mut dialog = open_dialog(&store, &MemorySettings::new());
    dialog.reject();

    dialog.select(1);
    dialog.set_password("late");
    dialog.add_new_profile();
    dialog.request_delete();
    assert!(!dialog.confirm());

    assert_eq!(dialog.phase(), DialogPhase::Closed(DialogResult::Rejected));
    assert_eq!(dialog.selected_index(), Some(0));
    assert_eq!(dialog.password(), "");
    assert!(!dialog.is_new_profile());
    assert!(store.state.lock().deleted.is_empty());
}

#[test]
fn test_unopened_dialog_ignores_input() {
    let mut dialog = PasswordDialog::new(
        Box::new(MemoryProfileStore::new()),
        Box::new(MemorySettings::new()),
        common::test_logos(),
        Translator::new(),
        "1.0.0",
    );
    dialog.set_password("pw");
    assert!(!dialog.confirm());
    assert_eq!(dialog.phase(), DialogPhase::Unopened);
}

// ============================================================================
// Deletion
// ============================================================================

#[test]
fn test_delete_flow_confirmed() {
    let store = MemoryProfileStore::new()
        .with(profile("a.ini", "Alpha", 1))
        .with(profile("b.ini", "Beta", 1));
    let mut dialog = open_dialog(&store, &MemorySettings::new());

    dialog.select(1);
    dialog.request_delete();
    assert_eq!(dialog.phase(), DialogPhase::Deleting);
    assert_eq!(
        dialog.delete_prompt().as_deref(),
        Some("Are you sure to delete \"Beta\" profile?")
    );

    dialog.confirm_delete();

    assert_eq!(store.state.lock().deleted, vec!["b.ini"]);
    let outcome = dialog.outcome().unwrap();
    assert_eq!(outcome.result, DialogResult::Accepted);
    assert!(outcome.reset_data);
}

#[test]
fn test_delete_flow_cancelled() {
    let store = MemoryProfileStore::new().with(profile("a.ini", "Alpha", 1));
    let mut dialog = open_dialog(&store, &MemorySettings::new());

    dialog.request_delete();
    dialog.cancel_delete();

    assert_eq!(dialog.phase(), DialogPhase::Selecting);
    assert!(dialog.delete_prompt().is_none());
    assert!(store.state.lock().deleted.is_empty());
    assert!(!dialog.is_reset_data());
}

#[test]
fn test_delete_synthetic_entry_targets_default_file() {
    let store = MemoryProfileStore::new();
    let mut dialog = open_dialog(&store, &MemorySettings::new());

    dialog.request_delete();
    dialog.confirm_delete();

    assert_eq!(store.state.lock().deleted, vec!["default.ini"]);
    assert!(dialog.outcome().unwrap().reset_data);
}

#[test]
fn test_delete_without_selection_does_nothing() {
    let store = MemoryProfileStore::new()
        .with(profile("a.ini", "A", 1))
        .lock("a.ini");
    let mut dialog = open_dialog(&store, &MemorySettings::new());

    dialog.request_delete();
    assert_ne!(dialog.phase(), DialogPhase::Deleting);
    dialog.confirm_delete();
    assert!(store.state.lock().deleted.is_empty());
}

#[test]
fn test_delete_prompt_is_translated() {
    let store = MemoryProfileStore::new().with(profile("a.ini", "Alpha", 1));
    let mut dialog = PasswordDialog::open(
        Box::new(store),
        Box::new(MemorySettings::new()),
        common::test_logos(),
        Translator::from_str_content("CONFIRM_DELETE_PROFILE=Profil \"%1\" löschen?\n"),
        "1.0.0",
    )
    .unwrap();

    dialog.request_delete();
    assert_eq!(
        dialog.delete_prompt().as_deref(),
        Some("Profil \"Alpha\" löschen?")
    );
}

// ============================================================================
// Description, title and time warnings
// ============================================================================

#[test]
fn test_description_visibility_follows_settings() {
    let store = MemoryProfileStore::new();
    let visible = open_dialog(&store, &MemorySettings::new());
    assert!(visible.description_visible());

    let hidden = open_dialog(&store, &MemorySettings::new().hide_description());
    assert!(!hidden.description_visible());
}

#[test]
fn test_dismiss_description_persists() {
    let settings = MemorySettings::new();
    let mut dialog = open_dialog(&MemoryProfileStore::new(), &settings);

    dialog.dismiss_description();

    assert!(!dialog.description_visible());
    assert!(settings.state.lock().hide_description);
}

#[test]
fn test_window_title_contains_version() {
    let dialog = open_dialog(&MemoryProfileStore::new(), &MemorySettings::new());
    assert_eq!(dialog.window_title(), "Enter Password v1.0.0");
}

struct FailingSource;

impl TimeSource for FailingSource {
    fn reference_time(&self) -> Result<chrono::DateTime<chrono::Utc>, TimeSyncError> {
        Err(TimeSyncError::MissingDate("no network".to_string()))
    }
}

#[test]
fn test_time_warnings_are_queued_and_dismissed() {
    let mut dialog = open_dialog(&MemoryProfileStore::new(), &MemorySettings::new());
    let time_sync = TimeSync::new(Arc::new(FailingSource));
    dialog.attach_time_sync(&time_sync);

    assert!(dialog.active_time_warning().is_none());
    time_sync.sync_now().join().unwrap();
    dialog.push_time_warning("second");

    assert!(dialog.active_time_warning().unwrap().contains("no network"));
    // Stays active until dismissed
    assert!(dialog.active_time_warning().unwrap().contains("no network"));
    dialog.dismiss_time_warning();
    assert_eq!(dialog.active_time_warning(), Some("second"));
    dialog.dismiss_time_warning();
    assert!(dialog.active_time_warning().is_none());
}
