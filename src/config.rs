use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use std::fmt;

use crate::constants::{DEFAULT_CSV_PATH, DEFAULT_MAX_UPLOAD_BYTES};
use crate::detector::DetectorMode;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub log_json: bool,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub csv_path: String,
    pub static_dir: String,
    pub cors_origin: String,
    pub max_upload_bytes: usize,
    pub detector: DetectorConfig,
}

#[derive(Clone)]
pub struct DetectorConfig {
    pub mode: DetectorMode,
    pub url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for DetectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorConfig")
            .field("mode", &self.mode)
            .field("url", &self.url)
            .field("api_key", &"***REDACTED***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 8501_u16),
            log_level: env_or("RUST_LOG", "info"),
            log_json: env_or_bool("LOG_JSON", false),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            csv_path: env_or("CSV_PATH", DEFAULT_CSV_PATH),
            static_dir: env_or("STATIC_DIR", "static"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:8501"),
            max_upload_bytes: env_or_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            detector: DetectorConfig {
                mode: env_or_parse("DETECTOR_MODE", DetectorMode::Unavailable),
                url: env_or("DETECTOR_URL", ""),
                api_key: env_or("DETECTOR_API_KEY", ""),
                timeout_secs: env_or_parse("DETECTOR_TIMEOUT_SECS", 30_u64),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
