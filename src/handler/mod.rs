//! Request handler module
//!
//! Static file serving: path normalization, mount resolution, the metadata
//! cache and the response decision.

pub mod metadata;
pub mod path;
pub mod resolver;
pub mod static_files;

// Re-export main entry point
pub use static_files::StaticFiles;
