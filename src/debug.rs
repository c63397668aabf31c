use parking_lot::Mutex;
/// Logging infrastructure for trade-gate
///
/// Every `log::info!()` etc. is written to `trade_gate_debug.log` in the
/// system temp directory, keeping stdout free for the dialog outcome.
/// When `RUST_LOG` is set, records are mirrored to stderr as well.
///
/// Level precedence: `--log-level` flag, then `RUST_LOG`, then `warn`.
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Log file name inside the temp directory
pub const LOG_FILE_NAME: &str = "trade_gate_debug.log";

struct FileLogger {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

/// Path of the debug log
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Parse a `RUST_LOG`-style level; module filters are not supported, so only
/// the first bare level in the list is honoured.
pub fn parse_level(value: &str) -> Option<log::LevelFilter> {
    value
        .split(',')
        .map(str::trim)
        .find(|part| !part.contains('='))
        .and_then(|part| part.parse().ok())
}

/// Pick the effective level from the CLI flag and `RUST_LOG`
pub fn resolve_level(
    cli_level: Option<log::LevelFilter>,
    rust_log: Option<&str>,
) -> log::LevelFilter {
    cli_level
        .or_else(|| rust_log.and_then(parse_level))
        .unwrap_or(log::LevelFilter::Warn)
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );

        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
        if self.mirror_stderr {
            eprint!("{}", line);
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

/// Route the `log` facade to the debug file.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let level = resolve_level(cli_level, rust_log.as_deref());

    let logger = LOGGER.get_or_init(|| {
        // A missing log file must not stop the dialog
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
            .ok();
        FileLogger {
            file: Mutex::new(file),
            mirror_stderr: rust_log.is_some(),
        }
    });

    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
        log::info!(
            "trade-gate {} debug session started (level={})",
            crate::VERSION,
            level
        );
    }
}
