//! Advisory per-profile lock markers.
//!
//! A running client that has a profile open keeps a zero-byte marker in the
//! temp directory. The marker name is derived from the SHA-256 of the
//! profile's absolute settings path, so any process resolving the same
//! data directory computes the same marker.

use crate::error::ProfileError;
use sha2::{Digest, Sha256};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use trade_gate_config::{AppPaths, LOCK_FILE_PREFIX};

/// Marker path for a profile settings file
pub fn lock_file_path(paths: &AppPaths, file_name: &str) -> PathBuf {
    let base_name = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let full_path = paths.data_dir.join(base_name);

    let mut hasher = Sha256::new();
    hasher.update(full_path.to_string_lossy().as_bytes());
    paths
        .temp_dir
        .join(format!("{}{:x}", LOCK_FILE_PREFIX, hasher.finalize()))
}

/// Whether another instance currently holds the profile.
///
/// On Windows a stale marker is deleted first. A live owner opens its marker
/// without delete sharing, so the delete fails and the profile still reports
/// as locked; elsewhere deleting an open file would succeed, so only existence
/// is checked.
pub fn is_profile_locked(paths: &AppPaths, file_name: &str) -> bool {
    let marker = lock_file_path(paths, file_name);

    #[cfg(windows)]
    if marker.exists() {
        if let Err(e) = fs::remove_file(&marker) {
            log::debug!("Lock marker {:?} is held: {}", marker, e);
        }
    }

    marker.exists()
}

/// RAII guard for a profile's lock marker. The marker is removed on drop.
#[derive(Debug)]
pub struct ProfileLock {
    path: PathBuf,
    file: Option<File>,
}

impl ProfileLock {
    /// Create the marker for `file_name`.
    ///
    /// Fails with [`ProfileError::Locked`] when another instance already
    /// holds it.
    pub fn acquire(paths: &AppPaths, file_name: &str) -> Result<Self, ProfileError> {
        if is_profile_locked(paths, file_name) {
            return Err(ProfileError::Locked(file_name.to_string()));
        }

        let path = lock_file_path(paths, file_name);
        fs::create_dir_all(&paths.temp_dir).map_err(|source| ProfileError::Io {
            path: paths.temp_dir.clone(),
            source,
        })?;

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(windows)]
        {
            use std::os::windows::fs::OpenOptionsExt;
            // FILE_SHARE_READ only: other processes cannot delete a live marker
            options.share_mode(0x0000_0001);
        }

        let file = options.open(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::AlreadyExists {
                ProfileError::Locked(file_name.to_string())
            } else {
                ProfileError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        log::info!("Acquired lock for profile {} at {:?}", file_name, path);
        Ok(Self {
            path,
            file: Some(file),
        })
    }

    /// Marker path held by this guard
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProfileLock {
    fn drop(&mut self) {
        // Close the handle first; Windows refuses to delete an open file.
        drop(self.file.take());
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("Failed to remove lock marker {:?}: {}", self.path, e);
        }
    }
}
