//! Logging bridge for par-mux.
//!
//! Routes every `log::info!()` / `log::debug!()` etc. to a debug log file so
//! diagnostic output never interleaves with a client's terminal:
//!
//! - `/tmp/par_mux_debug.log` on Unix/macOS
//! - `%TEMP%\par_mux_debug.log` on Windows
//!
//! When `RUST_LOG` is set, records are mirrored to stderr as well.
//!
//! Level precedence: `--log-level` CLI flag, then `RUST_LOG`, then the
//! config file's `log_level` (applied with [`set_level`] after the config is
//! loaded).

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

struct LogBridge {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl log::Log for LogBridge {
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

        let mut file = self.file.lock();
        if file.is_none() {
            *file = open_log_file();
        }
        if let Some(f) = file.as_mut() {
            // Logging must never take the process down
            let _ = f.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(f) = self.file.lock().as_mut() {
            let _ = f.flush();
        }
    }
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

/// Path of the debug log file
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    {
        PathBuf::from("/tmp/par_mux_debug.log")
    }
    #[cfg(not(unix))]
    {
        std::env::temp_dir().join("par_mux_debug.log")
    }
}

fn open_log_file() -> Option<File> {
    OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(log_path())
        .ok()
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

fn level_from_env() -> Option<log::LevelFilter> {
    let value = std::env::var("RUST_LOG").ok()?;
    // Accept a bare level ("debug") or the first directive of a filter list
    let directive = value.split(',').next()?.trim();
    let level = directive.rsplit('=').next()?;
    level.parse().ok()
}

/// Install the bridge as the global logger.
///
/// `cli_level` wins over `RUST_LOG`. Returns the level in effect; calling
/// this twice only updates the level.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) -> log::LevelFilter {
    let env_level = level_from_env();
    let level = cli_level.or(env_level).unwrap_or(log::LevelFilter::Off);

    let bridge = BRIDGE.get_or_init(|| LogBridge {
        file: Mutex::new(None),
        mirror_stderr: env_level.is_some(),
    });
    if log::set_logger(bridge).is_err() {
        log::debug!("log bridge already installed");
    }
    log::set_max_level(level);
    level
}

/// Change the level after startup, e.g. from the config file
pub fn set_level(level: log::LevelFilter) {
    log::set_max_level(level);
}
