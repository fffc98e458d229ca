// Application state module
// Runtime state shared by every connection of the demo server

use super::types::Config;
use crate::handler::StaticFiles;

/// Application state
pub struct AppState {
    pub config: Config,
    pub static_files: StaticFiles,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let static_files = StaticFiles::new(&config.static_files);
        Self {
            config,
            static_files,
        }
    }

    /// Access log format, `None` when access logging is off
    pub fn access_log_format(&self) -> Option<&str> {
        self.config
            .logging
            .access_log
            .then_some(self.config.logging.access_log_format.as_str())
    }
}
