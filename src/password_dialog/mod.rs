//! Profile selection and password unlock dialog
//!
//! The dialog logic lives in a headless state machine ([`PasswordDialog`]);
//! `dialogs` renders it with egui and `icons` caches the exchange logos.

mod dialogs;
mod icons;
mod state;

pub use icons::IconCache;
pub use state::{
    DialogError, DialogOutcome, DialogPhase, DialogResult, PasswordDialog, ProfileEntry,
    select_default_index,
};
