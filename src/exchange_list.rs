//! Bundled exchange list: integrity check and logo lookup.
//!
//! `resources/Exchanges/List.ini` maps numeric exchange ids (section names)
//! to a `Logo` file name. The list ships with a `List.ini.sha256` digest; a
//! list that fails verification means the installation was tampered with
//! and the client must not start.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use trade_gate_config::{AppPaths, IniDocument};

/// Errors from loading or verifying the exchange list
#[derive(Debug, Error)]
pub enum ListError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no signature found for exchange list {0:?}")]
    MissingSignature(PathBuf),

    #[error("signature file does not contain a valid SHA256 digest (got '{0}')")]
    MalformedSignature(String),

    #[error("exchange list {path:?} failed verification: expected {expected}, actual {actual}")]
    Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

/// Verifies that a bundled list file is authentic.
pub trait ListVerifier {
    fn verify(&self, path: &Path) -> Result<(), ListError>;
}

/// Accepts a list only when `<list>.sha256` holds the SHA-256 of its bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256DigestVerifier;

/// Companion digest path for a list file (`List.ini` -> `List.ini.sha256`)
pub fn digest_path(list_path: &Path) -> PathBuf {
    let mut name = list_path.as_os_str().to_owned();
    name.push(".sha256");
    PathBuf::from(name)
}

/// SHA-256 of `data` as lowercase hex
pub fn compute_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Parse the expected digest from a `.sha256` file.
///
/// Accepts a bare hash or the `hash  filename` layout written by
/// `sha256sum`.
pub fn parse_digest_file(content: &str) -> Result<String, ListError> {
    let hash = content
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();

    if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ListError::MalformedSignature(hash));
    }
    Ok(hash)
}

impl ListVerifier for Sha256DigestVerifier {
    fn verify(&self, path: &Path) -> Result<(), ListError> {
        let data = std::fs::read(path).map_err(|source| ListError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let sig_path = digest_path(path);
        if !sig_path.exists() {
            return Err(ListError::MissingSignature(path.to_path_buf()));
        }
        let sig = std::fs::read_to_string(&sig_path).map_err(|source| ListError::Read {
            path: sig_path.clone(),
            source,
        })?;

        let expected = parse_digest_file(&sig)?;
        let actual = compute_digest(&data);
        if expected != actual {
            return Err(ListError::Mismatch {
                path: path.to_path_buf(),
                expected,
                actual,
            });
        }

        log::debug!("Exchange list {:?} verified", path);
        Ok(())
    }
}

/// Exchange id -> logo path, with a fallback icon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeLogos {
    logos: BTreeMap<i64, PathBuf>,
    unknown: PathBuf,
}

impl ExchangeLogos {
    /// Verify and load the bundled list from the resource directory
    pub fn load(paths: &AppPaths, verifier: &dyn ListVerifier) -> Result<Self, ListError> {
        let list_path = paths.exchange_list_path();
        verifier.verify(&list_path)?;

        let content = std::fs::read_to_string(&list_path).map_err(|source| ListError::Read {
            path: list_path.clone(),
            source,
        })?;
        let doc = IniDocument::parse(&content);
        let logos = Self::from_document(&doc, &paths.logos_dir(), paths.unknown_logo_path());
        log::info!("Loaded {} exchange logo(s)", logos.len());
        Ok(logos)
    }

    /// Build the map from a parsed list.
    ///
    /// Sections whose name is not an integer, or whose `Logo` is empty, are
    /// skipped.
    pub fn from_document(doc: &IniDocument, logos_dir: &Path, unknown: PathBuf) -> Self {
        let logos = doc
            .child_groups()
            .into_iter()
            .filter_map(|group| {
                let id: i64 = group.trim().parse().ok()?;
                let logo = doc.get(&format!("{group}/Logo"))?.trim();
                if logo.is_empty() {
                    return None;
                }
                Some((id, logos_dir.join(logo)))
            })
            .collect();
        Self { logos, unknown }
    }

    pub fn len(&self) -> usize {
        self.logos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logos.is_empty()
    }

    /// Listed logo for an exchange, whether or not the file exists
    pub fn logo_for(&self, exchange_id: i64) -> Option<&Path> {
        self.logos.get(&exchange_id).map(PathBuf::as_path)
    }

    /// Icon to display for an exchange: its logo when listed and present on
    /// disk, otherwise the "unknown" icon
    pub fn resolve_icon(&self, exchange_id: i64) -> PathBuf {
        match self.logo_for(exchange_id) {
            Some(path) if path.exists() => path.to_path_buf(),
            _ => self.unknown.clone(),
        }
    }
}
