// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub static_files: StaticConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive for the tracing subscriber, e.g. "info" or "mountserve=debug"
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Static file handler configuration, immutable once the handler is built
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StaticConfig {
    /// Directories to serve from, highest priority first
    #[serde(default)]
    pub dirs: Vec<DirMount>,
    #[serde(default = "default_enable_gzip")]
    pub enable_gzip: bool,
    /// `max-age` in seconds for the derived Cache-Control header
    #[serde(default)]
    pub max_age: u64,
    /// Explicit Cache-Control value, overrides `max_age`
    #[serde(default)]
    pub cache_control: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_enable_gzip() -> bool {
    true
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            enable_gzip: default_enable_gzip(),
            max_age: 0,
            cache_control: None,
        }
    }
}

impl StaticConfig {
    /// Cache-Control header value sent with every full response
    ///
    /// # Examples
    /// ```
    /// use mountserve::config::StaticConfig;
    ///
    /// let mut cfg = StaticConfig { max_age: 600, ..StaticConfig::default() };
    /// assert_eq!(cfg.cache_control_header(), "public, max-age=600");
    ///
    /// cfg.cache_control = Some("no-store".to_string());
    /// assert_eq!(cfg.cache_control_header(), "no-store");
    /// ```
    pub fn cache_control_header(&self) -> String {
        match &self.cache_control {
            Some(value) => value.clone(),
            None => format!("public, max-age={}", self.max_age),
        }
    }

    /// Append a mount, builder style
    #[must_use]
    pub fn with_dir(mut self, mount: DirMount) -> Self {
        self.dirs.push(mount);
        self
    }
}

/// One directory served by the handler
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DirMount {
    /// Root directory on disk, absolute or relative to the working directory
    pub path: String,
    /// URL prefix the directory is mounted under, e.g. "/assets"
    #[serde(default)]
    pub mount_path: Option<String>,
}

impl DirMount {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mount_path: None,
        }
    }

    #[must_use]
    pub fn mounted_at(mut self, prefix: impl Into<String>) -> Self {
        self.mount_path = Some(prefix.into());
        self
    }
}
