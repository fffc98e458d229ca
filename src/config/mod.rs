// Configuration module entry point
// Loads the server configuration and holds the runtime state built from it

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, DirMount, LoggingConfig, ServerConfig, StaticConfig};

/// Default config file name (without extension)
const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `MOUNTSERVE_SERVER__PORT=9000`
const ENV_PREFIX: &str = "MOUNTSERVE";

impl Config {
    /// Load configuration from "config.toml" in the working directory, if present
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(format!("{ENV_PREFIX}_CONFIG"))
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("static_files.enable_gzip", true)?
            .set_default("static_files.max_age", 0)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
