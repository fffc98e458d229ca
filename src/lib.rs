//! Static file serving middleware for hyper.
//!
//! [`StaticFiles`] resolves request paths against an ordered list of mounted
//! directories, caches per-path file metadata, answers conditional requests
//! with 304, and gzip-streams compressible files. Requests it cannot serve go
//! to the caller's next handler.
//!
//! ```no_run
//! use mountserve::config::{DirMount, StaticConfig};
//! use mountserve::http::build_404_response;
//! use mountserve::StaticFiles;
//!
//! # async fn demo(req: hyper::Request<()>) -> Result<(), mountserve::ServeError> {
//! let config = StaticConfig::default()
//!     .with_dir(DirMount::new("public"))
//!     .with_dir(DirMount::new("node_modules/bootstrap/dist").mounted_at("/vendor"));
//! let files = StaticFiles::new(&config);
//!
//! let response = files
//!     .handle(&req, || async { Ok(build_404_response()) })
//!     .await?;
//! # let _ = response;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;

pub use error::ServeError;
pub use handler::StaticFiles;
pub use http::ServeBody;
