//! Application startup after CLI processing.
//!
//! Resolves paths, verifies the bundled exchange list, builds the dialog and
//! hands it to a presenter. The window itself is injected so the whole
//! sequence, including the integrity failure exit, runs without a display.

use crate::cli::{OutcomeSummary, RuntimeOptions};
use crate::exchange_list::{ExchangeLogos, Sha256DigestVerifier};
use crate::password_dialog::{DialogOutcome, DialogResult, PasswordDialog};
use crate::time_sync::{HttpDateSource, TimeSync};
use anyhow::{Context, Result};
use std::sync::Arc;
use trade_gate_config::{AppPaths, IniAppSettings, Translator};
use trade_gate_profiles::FsProfileStore;

/// Exit code when the bundled exchange list fails verification
pub const EXIT_CORRUPTED: i32 = 2;

/// Exit code when the user cancels the dialog
pub const EXIT_REJECTED: i32 = 1;

/// Language file loaded from the resources directory
const DEFAULT_LOCALE: &str = "en";

/// Reports an error that ends the program before the dialog opens
pub trait FatalNotifier {
    fn fatal(&self, title: &str, message: &str);
}

/// Shows a native error box and mirrors the text to stderr.
///
/// Release builds on Windows have no console, so stderr alone is lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageBoxNotifier;

impl FatalNotifier for MessageBoxNotifier {
    fn fatal(&self, title: &str, message: &str) {
        eprintln!("{}", message);
        let _ = rfd::MessageDialog::new()
            .set_title(title)
            .set_level(rfd::MessageLevel::Error)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

fn load_translator(paths: &AppPaths) -> Translator {
    Translator::load(&paths.language_path(DEFAULT_LOCALE)).unwrap_or_else(|e| {
        log::warn!("Falling back to built-in strings: {}", e);
        Translator::new()
    })
}

/// Run the unlock flow and return the process exit code.
///
/// `present` shows the dialog and returns once it is closed. On accept the
/// outcome is printed as JSON and the code is 0.
pub fn run<F>(options: &RuntimeOptions, notifier: &dyn FatalNotifier, present: F) -> Result<i32>
where
    F: FnOnce(PasswordDialog) -> Result<DialogOutcome>,
{
    let paths = options.app_paths()?;
    let translator = load_translator(&paths);

    let logos = match ExchangeLogos::load(&paths, &Sha256DigestVerifier) {
        Ok(logos) => logos,
        Err(e) => {
            log::error!("Exchange list rejected: {}", e);
            notifier.fatal(
                &translator.tr("ERROR_TITLE", "Error"),
                &translator.tr(
                    "PROGRAM_CORRUPTED",
                    "The program is corrupted. Download from the official site.",
                ),
            );
            return Ok(EXIT_CORRUPTED);
        }
    };

    let settings = IniAppSettings::open(paths.app_settings_path())
        .context("Failed to open application settings")?;
    let store = FsProfileStore::new(paths);
    let dialog = PasswordDialog::open(
        Box::new(store),
        Box::new(settings),
        logos,
        translator,
        crate::VERSION,
    )?;

    if !options.no_time_sync {
        let time_sync = TimeSync::new(Arc::new(HttpDateSource::default()));
        dialog.attach_time_sync(&time_sync);
        // Detached; a slow time server must not delay the dialog
        let _ = time_sync.sync_now();
    }

    let outcome = present(dialog)?;
    match outcome.result {
        DialogResult::Accepted => {
            println!(
                "{}",
                serde_json::to_string_pretty(&OutcomeSummary::from(&outcome))?
            );
            Ok(0)
        }
        DialogResult::Rejected => {
            log::info!("Unlock cancelled");
            Ok(EXIT_REJECTED)
        }
    }
}
