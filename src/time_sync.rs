//! Clock drift check against a reference time source.
//!
//! Exchange APIs reject signed requests whose timestamp is too far from
//! server time, so the client warns early when the local clock is off.
//! Interested components register a callback with [`TimeSync::on_warning`];
//! [`TimeSync::sync_now`] runs the check on a background thread and invokes
//! every callback with the warning text.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

/// Largest tolerated difference between local and reference clocks
pub const MAX_CLOCK_SKEW: Duration = Duration::from_secs(60);

/// Timeout for the reference-time request
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default host whose `Date` header is used as reference time
pub const DEFAULT_TIME_URL: &str = "https://www.google.com";

/// Why the reference time could not be obtained
#[derive(Debug, Error)]
pub enum TimeSyncError {
    #[error("failed to reach time server {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("time server {0} sent no Date header")]
    MissingDate(String),

    #[error("time server {0} sent a Date header that is not valid text")]
    UnreadableDate(String),

    #[error("invalid Date header '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Provides the current reference time
pub trait TimeSource: Send + Sync {
    fn reference_time(&self) -> Result<DateTime<Utc>, TimeSyncError>;
}

/// Reads the `Date` header of an HTTPS `HEAD` response.
#[derive(Debug, Clone)]
pub struct HttpDateSource {
    url: String,
}

impl HttpDateSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for HttpDateSource {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_URL)
    }
}

fn agent() -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(HTTP_TIMEOUT))
        .build()
        .into()
}

/// Parse an HTTP `Date` header value (`Sun, 06 Nov 1994 08:49:37 GMT`)
pub fn parse_http_date(value: &str) -> Result<DateTime<Utc>, TimeSyncError> {
    DateTime::parse_from_rfc2822(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| TimeSyncError::InvalidDate {
            value: value.to_string(),
            source,
        })
}

impl TimeSource for HttpDateSource {
    fn reference_time(&self) -> Result<DateTime<Utc>, TimeSyncError> {
        let response = agent()
            .head(&self.url)
            .header("User-Agent", "trade-gate")
            .call()
            .map_err(|source| TimeSyncError::Request {
                url: self.url.clone(),
                source,
            })?;

        let date = response
            .headers()
            .get("date")
            .ok_or_else(|| TimeSyncError::MissingDate(self.url.clone()))?
            .to_str()
            .map_err(|_| TimeSyncError::UnreadableDate(self.url.clone()))?;

        parse_http_date(date)
    }
}

/// Warning text when `local` differs from `reference` by more than
/// `max_skew`
pub fn skew_warning(
    local: DateTime<Utc>,
    reference: DateTime<Utc>,
    max_skew: Duration,
) -> Option<String> {
    let skew = (local - reference).num_seconds().unsigned_abs();
    if skew <= max_skew.as_secs() {
        return None;
    }
    let direction = if local > reference { "ahead of" } else { "behind" };
    Some(format!(
        "Your system clock is {} seconds {} the server time. \
         Exchange requests may be rejected until the clock is synchronized.",
        skew, direction
    ))
}

type WarningCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Time synchronization collaborator with warning subscribers.
#[derive(Clone)]
pub struct TimeSync {
    source: Arc<dyn TimeSource>,
    listeners: Arc<Mutex<Vec<WarningCallback>>>,
    max_skew: Duration,
}

impl TimeSync {
    pub fn new(source: Arc<dyn TimeSource>) -> Self {
        Self {
            source,
            listeners: Arc::new(Mutex::new(Vec::new())),
            max_skew: MAX_CLOCK_SKEW,
        }
    }

    /// Override the tolerated skew
    pub fn with_max_skew(mut self, max_skew: Duration) -> Self {
        self.max_skew = max_skew;
        self
    }

    /// Register a warning callback
    pub fn on_warning(&self, callback: impl Fn(&str) + Send + Sync + 'static) {
        self.listeners.lock().push(Box::new(callback));
    }

    fn emit(&self, message: &str) {
        log::warn!("Time sync: {}", message);
        for listener in self.listeners.lock().iter() {
            listener(message);
        }
    }

    /// Run the check on the calling thread and notify listeners.
    ///
    /// Returns the warning that was emitted, if any.
    pub fn check_now(&self) -> Option<String> {
        let warning = match self.source.reference_time() {
            Ok(reference) => skew_warning(Utc::now(), reference, self.max_skew),
            Err(e) => Some(format!("Unable to verify the system time: {}", e)),
        };
        match &warning {
            Some(message) => self.emit(message),
            None => log::debug!("System clock within {:?} of reference", self.max_skew),
        }
        warning
    }

    /// Run the check on a background thread
    pub fn sync_now(&self) -> JoinHandle<()> {
        let this = self.clone();
        std::thread::spawn(move || {
            this.check_now();
        })
    }
}
