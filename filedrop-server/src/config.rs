use serde::Deserialize;

use filedrop_core::RetentionPeriod;
use filedrop_lifecycle::IngestLimits;

/// Top-level configuration for the filedrop server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct FiledropConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload validation and storage configuration.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Background cleanup configuration.
    #[serde(default)]
    pub cleanup: CleanupConfig,
    /// Upload rate limiting configuration.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// HTTP server bind configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
    /// External URL used to build download links
    /// (e.g. `https://files.example.com`).
    ///
    /// If not set, defaults to `http://{host}:{port}`.
    pub external_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
            external_url: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout() -> u64 {
    30
}

/// Upload validation and storage configuration.
#[derive(Debug, Deserialize)]
pub struct UploadConfig {
    /// Directory uploaded files are written into.
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    /// Maximum accepted file size in bytes (default: 10 MiB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Lower-cased extensions (with leading dot) accepted for upload.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Retention applied when the upload does not specify one.
    #[serde(default)]
    pub default_retention: RetentionPeriod,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_file_size_bytes: default_max_file_size(),
            allowed_extensions: default_allowed_extensions(),
            default_retention: RetentionPeriod::default(),
        }
    }
}

impl UploadConfig {
    /// The ingest limits this configuration implies.
    pub fn limits(&self) -> IngestLimits {
        IngestLimits {
            max_size_bytes: self.max_file_size_bytes,
            allowed_extensions: self.allowed_extensions.clone(),
        }
    }
}

fn default_upload_dir() -> String {
    "./uploads".to_owned()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    IngestLimits::default().allowed_extensions
}

/// Background cleanup configuration.
#[derive(Debug, Deserialize)]
pub struct CleanupConfig {
    /// Whether the periodic reconciliation sweep runs.
    #[serde(default = "default_cleanup_enabled")]
    pub enabled: bool,
    /// Sweep period in seconds (default: 1 hour).
    #[serde(default = "default_cleanup_interval")]
    pub interval_seconds: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: default_cleanup_enabled(),
            interval_seconds: default_cleanup_interval(),
        }
    }
}

fn default_cleanup_enabled() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    3600 // 1 hour
}

/// Upload rate limiting configuration.
#[derive(Debug, Deserialize)]
pub struct RateLimitConfig {
    /// Whether the upload route is rate limited.
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,
    /// Window length in seconds (default: 15 minutes).
    #[serde(default = "default_rate_limit_window")]
    pub window_seconds: u64,
    /// Maximum uploads per client per window.
    #[serde(default = "default_rate_limit_max")]
    pub max_requests: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            window_seconds: default_rate_limit_window(),
            max_requests: default_rate_limit_max(),
        }
    }
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_rate_limit_window() -> u64 {
    900 // 15 minutes
}

fn default_rate_limit_max() -> u64 {
    10
}
