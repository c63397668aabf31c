// Library exports for testing and potential library use
//
// The dialog logic is headless (`password_dialog::PasswordDialog`) so it can
// be driven from integration tests; `app` wraps it in an eframe window.

/// Application version, shown in the dialog title.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;

pub mod app;
pub mod cli;
pub mod exchange_list;
pub mod password_dialog;
pub mod startup;
pub mod time_sync;
