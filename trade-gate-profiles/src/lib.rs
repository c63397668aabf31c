//! Profile storage for the trade-gate unlock dialog.
//!
//! - [`types`]: `ProfileRecord` and the settings keys it maps to
//! - [`store`]: `ProfileStore` trait and the file-system implementation
//! - [`lock`]: advisory lock markers in the temp directory
//! - [`migrate`]: legacy shared-script migration
//! - [`delete`]: profile deletion with companion cleanup

pub mod delete;
pub mod error;
pub mod lock;
pub mod migrate;
pub mod store;
pub mod types;

pub use delete::{DeletionReport, LEGACY_COMPANION_CONFIG, delete_profile};
pub use error::ProfileError;
pub use lock::{ProfileLock, is_profile_locked, lock_file_path};
pub use migrate::{LEGACY_SCRIPT_EXTENSIONS, MigrationReport, migrate_legacy_scripts};
pub use store::{FsProfileStore, ProfileStore};
pub use types::{
    API_KEY_SIGN_KEY, EXCHANGE_ID_KEY, MISSING_EXCHANGE_ID, NAME_KEY, ProfileRecord,
    UNSET_EXCHANGE_ID,
};
