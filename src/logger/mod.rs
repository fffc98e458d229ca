//! Logger module
//!
//! Named log events for the static file handler and the demo server. Call
//! sites use these functions instead of formatting log lines themselves;
//! each one emits a `tracing` event with structured fields.

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. Should be called once
/// at application startup; later calls are ignored.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(%addr, "static file server listening");
    for (index, mount) in config.static_files.dirs.iter().enumerate() {
        tracing::info!(
            priority = index,
            root = %mount.path,
            mount_path = mount.mount_path.as_deref().unwrap_or("/"),
            "serving directory"
        );
    }
    tracing::info!(
        gzip = config.static_files.enable_gzip,
        cache_control = %config.static_files.cache_control_header(),
        workers = ?config.server.workers,
        "response settings"
    );
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!(error = ?err, "failed to serve connection");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// A request path climbed out of a mount root
pub fn log_traversal_blocked(request_path: &str, candidate: &str) {
    tracing::warn!(request_path, candidate, "path traversal attempt blocked");
}

pub fn log_cache_populated(request_path: &str, disk_path: &Path) {
    tracing::debug!(request_path, disk_path = %disk_path.display(), "cached file metadata");
}

pub fn log_cache_refreshed(request_path: &str, disk_path: &Path) {
    tracing::debug!(request_path, disk_path = %disk_path.display(), "file changed on disk, metadata refreshed");
}

/// A cached file could not be stat'ed again
pub fn log_vanished(request_path: &str, disk_path: &Path, err: &std::io::Error) {
    tracing::error!(
        request_path,
        disk_path = %disk_path.display(),
        error = %err,
        "cached file is no longer accessible"
    );
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
