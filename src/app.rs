//! eframe host for the password dialog.
//!
//! The dialog runs in its own small native window. Once it closes, the
//! outcome is handed back through a shared slot and the viewport is closed.

use crate::password_dialog::{DialogOutcome, DialogResult, IconCache, PasswordDialog};
use anyhow::{Result, anyhow};
use eframe::Frame;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

const WINDOW_WIDTH: f32 = 420.0;
const WINDOW_HEIGHT: f32 = 260.0;

/// Poll interval so queued time warnings appear without user input
const REPAINT_INTERVAL: Duration = Duration::from_millis(250);

type OutcomeSlot = Arc<Mutex<Option<DialogOutcome>>>;

/// Native window around a [`PasswordDialog`]
pub struct UnlockApp {
    dialog: PasswordDialog,
    icons: IconCache,
    outcome: OutcomeSlot,
}

impl UnlockApp {
    fn new(dialog: PasswordDialog, outcome: OutcomeSlot) -> Self {
        Self {
            dialog,
            icons: IconCache::new(),
            outcome,
        }
    }
}

impl eframe::App for UnlockApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if ctx.input(|i| i.viewport().close_requested()) && !self.dialog.is_closed() {
            log::info!("Window closed without a choice");
            self.dialog.reject();
        }

        self.dialog.show(ctx, &mut self.icons);

        if let Some(outcome) = self.dialog.outcome() {
            log::info!(
                "Dialog closed: {:?} (new_profile={}, reset_data={})",
                outcome.result,
                outcome.new_profile,
                outcome.reset_data
            );
            *self.outcome.lock() = Some(outcome);
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}

/// Show the dialog until the user closes it.
///
/// Closing the window without choosing counts as a rejection.
pub fn run_dialog(dialog: PasswordDialog) -> Result<DialogOutcome> {
    let title = dialog.window_title();
    let fallback_path = dialog.ini_file_path();
    let outcome: OutcomeSlot = Arc::new(Mutex::new(None));
    let app = UnlockApp::new(dialog, Arc::clone(&outcome));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_resizable(false),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(&title, options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow!("Failed to run the password dialog: {e}"))?;

    let outcome = outcome.lock().take();
    Ok(outcome.unwrap_or(DialogOutcome {
        result: DialogResult::Rejected,
        password: String::new(),
        ini_path: fallback_path,
        new_profile: false,
        reset_data: false,
    }))
}
