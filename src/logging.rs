use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub json_stdout: bool,
    pub enable_file_logs: bool,
    pub log_dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_stdout: false,
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
        }
    }
}

impl From<&Config> for LogConfig {
    fn from(config: &Config) -> Self {
        Self {
            log_level: config.log_level.clone(),
            json_stdout: config.log_json,
            enable_file_logs: config.enable_file_logs,
            log_dir: config.log_dir.clone(),
        }
    }
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// lifetime of the process or buffered file output is lost on exit.
pub fn init_tracing(config: &LogConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let stdout_layer = if config.json_stdout {
        fmt::layer().with_target(true).json().boxed()
    } else {
        fmt::layer().with_target(true).with_thread_ids(false).boxed()
    };

    let registry = Registry::default().with(env_filter).with(stdout_layer);

    let (result, guard) = if config.enable_file_logs {
        let file_appender = match RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("hillani-measurements")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&config.log_dir)
        {
            Ok(appender) => appender,
            Err(e) => panic!("Failed to create rolling file appender in {}: {e}", config.log_dir),
        };
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        let file_layer = fmt::layer().with_writer(writer).with_ansi(false).json();
        (registry.with(file_layer).try_init(), Some(guard))
    } else {
        (registry.try_init(), None)
    };

    // A subscriber installed earlier (tests, embedding) is not an error.
    if let Err(e) = result {
        let msg = e.to_string();
        if !msg.contains("already been set") {
            panic!("Failed to initialize tracing: {e}");
        }
    }
    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let cfg = LogConfig::default();
        let _ = init_tracing(&cfg);
        let _ = init_tracing(&cfg);
    }

    #[test]
    fn file_logs_return_guard() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let cfg = LogConfig {
            enable_file_logs: true,
            log_dir: tmp.path().to_string_lossy().to_string(),
            ..LogConfig::default()
        };
        assert!(init_tracing(&cfg).is_some());
    }
}
