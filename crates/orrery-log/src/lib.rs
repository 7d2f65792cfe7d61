//! Structured logging for the orrery.
//!
//! One `tracing` subscriber with a console layer (uptime timestamps, module
//! targets) and, in debug builds, a JSON file layer. Library crates log
//! through the `log` facade, which the subscriber also receives.

use std::fs::File;
use std::path::Path;

use orrery_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config provide one.
pub const DEFAULT_FILTER: &str = "info";

/// JSON log written in debug builds.
pub const LOG_FILE_NAME: &str = "orrery.log";

/// Filter directive from the config, or [`DEFAULT_FILTER`] when unset or blank.
pub fn filter_string(config: Option<&Config>) -> String {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// `RUST_LOG` if set and valid, else [`filter_string`].
pub fn resolve_filter(config: Option<&Config>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_string(config)))
}

/// Create `log_dir` and open a fresh [`LOG_FILE_NAME`] in it.
pub fn open_log_file(log_dir: &Path) -> Option<File> {
    std::fs::create_dir_all(log_dir).ok()?;
    File::create(log_dir.join(LOG_FILE_NAME)).ok()
}

/// Install the global subscriber.
///
/// The JSON file layer is only added when `debug_build` is set and `log_dir`
/// can be written; failure to open it is not fatal. Calling this twice is a
/// no-op after the first call.
///
/// ```no_run
/// use orrery_config::Config;
/// use orrery_log::init_logging;
///
/// init_logging(None, false, Some(&Config::default()));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let console = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let json_file = log_dir
        .filter(|_| debug_build)
        .and_then(open_log_file)
        .map(|file| {
            fmt::layer()
                .json()
                .with_writer(file)
                .with_ansi(false)
                .with_timer(fmt::time::uptime())
        });

    let installed = tracing_subscriber::registry()
        .with(resolve_filter(config))
        .with(console)
        .with(json_file)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Logging already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_string_prefers_config() {
        let mut config = Config::default();
        config.debug.log_level = "debug,orrery_space=trace".to_string();
        assert_eq!(filter_string(Some(&config)), "debug,orrery_space=trace");
    }

    #[test]
    fn test_filter_string_falls_back_on_blank_level() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_string(Some(&config)), DEFAULT_FILTER);
        assert_eq!(filter_string(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_crate_directives_parse() {
        for directive in [
            "info",
            "debug,orrery_mesh=trace",
            "warn,orrery_space=debug,orrery_animation=trace",
        ] {
            assert!(EnvFilter::try_new(directive).is_ok(), "bad directive {directive}");
        }
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("nested").join("logs");
        assert!(open_log_file(&log_dir).is_some());
        assert!(log_dir.join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging(None, false, None);
        init_logging(None, false, None);
    }
}
