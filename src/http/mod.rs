//! HTTP protocol layer module
//!
//! Protocol helpers shared by the static file handler: MIME lookup,
//! conditional requests, encoding negotiation, gzip streaming and bodies.

pub mod cache;
pub mod encoding;
pub mod gzip;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{build_404_response, build_500_response, ServeBody};
