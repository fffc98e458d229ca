//! Request path to on-disk file resolution
//!
//! Mounts are tried in configured order; the first one holding a regular file
//! wins. A candidate that escapes its mount root stops resolution entirely.

use crate::config::DirMount;
use crate::handler::path::PosixPath;
use crate::logger;
use std::fs::Metadata;
use std::path::PathBuf;

/// A configured directory with its root and prefix pre-normalized
#[derive(Debug, Clone)]
pub struct Mount {
    root: PosixPath,
    prefix: Option<PosixPath>,
}

impl Mount {
    pub fn new(config: &DirMount) -> Self {
        Self {
            root: PosixPath::parse(&config.path),
            prefix: config.mount_path.as_deref().map(PosixPath::parse),
        }
    }

    /// The path relative to this mount's root, `None` if the prefix does not match
    pub fn relative(&self, path: &PosixPath) -> Option<PosixPath> {
        match &self.prefix {
            Some(prefix) => path.strip_prefix(prefix),
            None => path.strip_prefix(&PosixPath::parse("/")),
        }
    }

    pub const fn root(&self) -> &PosixPath {
        &self.root
    }
}

/// Outcome of resolving one request path
#[derive(Debug)]
pub enum Resolution {
    /// A regular file, with the stat result that found it
    Found { disk_path: PathBuf, metadata: Metadata },
    /// No mount holds a regular file for this path
    NotFound,
    /// The path climbed out of a mount root
    Rejected,
}

/// Resolves request paths against an ordered list of mounts
#[derive(Debug, Clone)]
pub struct Resolver {
    mounts: Vec<Mount>,
}

impl Resolver {
    pub fn new(dirs: &[DirMount]) -> Self {
        Self {
            mounts: dirs.iter().map(Mount::new).collect(),
        }
    }

    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    /// Resolve a normalized request path to a regular file
    pub async fn resolve(&self, path: &PosixPath) -> Resolution {
        if path.is_directory() {
            return Resolution::NotFound;
        }

        for mount in &self.mounts {
            let Some(relative) = mount.relative(path) else {
                continue;
            };

            let candidate = mount.root.join(&relative);
            if !mount.root.contains(&candidate) {
                logger::log_traversal_blocked(&path.to_string(), &candidate.to_string());
                return Resolution::Rejected;
            }

            let disk_path = candidate.to_path_buf();
            match tokio::fs::metadata(&disk_path).await {
                Ok(metadata) if metadata.is_file() => {
                    return Resolution::Found {
                        disk_path,
                        metadata,
                    };
                }
                // Missing, unreadable or a directory: try the next mount
                Ok(_) | Err(_) => {}
            }
        }

        Resolution::NotFound
    }
}
