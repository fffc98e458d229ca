//! Static file serving module
//!
//! `StaticFiles` answers GET and HEAD requests from a set of mounted
//! directories and hands everything else to the next handler.

use crate::config::StaticConfig;
use crate::error::ServeError;
use crate::handler::metadata::{CachedFile, MetadataCache};
use crate::handler::path::PosixPath;
use crate::handler::resolver::{Resolution, Resolver};
use crate::http::response::{empty_body, file_body, ServeBody};
use crate::http::{cache, encoding, mime};
use crate::logger;
use hyper::header::{
    CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, VARY,
};
use hyper::{HeaderMap, Method, Request, Response, StatusCode};
use std::fs::Metadata;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::SystemTime;

/// Files at or below this size are never compressed
pub const GZIP_MIN_SIZE: u64 = 1024;

/// Static file handler over one or more mounted directories
#[derive(Debug)]
pub struct StaticFiles {
    resolver: Resolver,
    cache: MetadataCache,
    enable_gzip: bool,
    cache_control: String,
}

impl StaticFiles {
    pub fn new(config: &StaticConfig) -> Self {
        Self {
            resolver: Resolver::new(&config.dirs),
            cache: MetadataCache::new(),
            enable_gzip: config.enable_gzip,
            cache_control: config.cache_control_header(),
        }
    }

    /// Serve the request, or await `next` when no file matches
    pub async fn handle<B, F, Fut>(
        &self,
        req: &Request<B>,
        next: F,
    ) -> Result<Response<ServeBody>, ServeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Response<ServeBody>, ServeError>>,
    {
        match self.serve(req).await? {
            Some(response) => Ok(response),
            None => next().await,
        }
    }

    /// Serve the request if it names a static file
    ///
    /// Returns `Ok(None)` for methods other than GET/HEAD, misses and
    /// traversal attempts.
    pub async fn serve<B>(&self, req: &Request<B>) -> Result<Option<Response<ServeBody>>, ServeError> {
        let method = req.method();
        if method != Method::GET && method != Method::HEAD {
            return Ok(None);
        }

        let path = PosixPath::from_request(req.uri().path());
        let Some(entry) = self.lookup(&path).await? else {
            return Ok(None);
        };

        self.respond(&entry, method == Method::HEAD, req.headers())
            .map(Some)
    }

    /// Cached metadata for a request path, resolving and revalidating as needed
    ///
    /// Directory forms (`/a.txt/`, `/a.txt/.`) are declined before the cache
    /// is consulted. A hit is re-stat'ed on every call and replaced when its
    /// modification time changed. A hit that can no longer be stat'ed, or
    /// that is no longer a regular file, is an error.
    pub async fn lookup(&self, path: &PosixPath) -> Result<Option<Arc<CachedFile>>, ServeError> {
        if path.is_directory() {
            return Ok(None);
        }
        let key = path.to_string();

        if let Some(entry) = self.cache.get(&key) {
            let current = match restat_file(&entry).await {
                Ok(metadata) => metadata,
                Err(source) => {
                    logger::log_vanished(&key, &entry.disk_path, &source);
                    return Err(ServeError::Vanished {
                        request_path: key,
                        disk_path: entry.disk_path.clone(),
                        source,
                    });
                }
            };

            if !entry.is_stale(&current) {
                return Ok(Some(entry));
            }

            logger::log_cache_refreshed(&key, &entry.disk_path);
            return Ok(Some(self.cache.insert(key, entry.refreshed(current))));
        }

        match self.resolver.resolve(path).await {
            Resolution::Found {
                disk_path,
                metadata,
            } => {
                logger::log_cache_populated(&key, &disk_path);
                Ok(Some(self.cache.insert(key, CachedFile::new(disk_path, metadata))))
            }
            Resolution::NotFound | Resolution::Rejected => Ok(None),
        }
    }

    /// Build the response for a cached file
    fn respond(
        &self,
        entry: &CachedFile,
        is_head: bool,
        headers: &HeaderMap,
    ) -> Result<Response<ServeBody>, ServeError> {
        let mut builder =
            Response::builder().header(LAST_MODIFIED, cache::format_http_date(entry.modified));
        if self.enable_gzip {
            builder = builder.header(VARY, "Accept-Encoding");
        }

        if cache::is_fresh(headers, entry.modified) {
            return Ok(builder.status(StatusCode::NOT_MODIFIED).body(empty_body())?);
        }

        let gzip = self.should_compress(entry) && encoding::accepts_gzip(headers);

        builder = builder
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, entry.content_type)
            .header(CACHE_CONTROL, &self.cache_control);
        builder = if gzip {
            builder.header(CONTENT_ENCODING, "gzip")
        } else {
            builder.header(CONTENT_LENGTH, entry.size)
        };

        let body = if is_head {
            empty_body()
        } else {
            file_body(entry.disk_path.clone(), gzip)
        };

        Ok(builder.body(body)?)
    }

    fn should_compress(&self, entry: &CachedFile) -> bool {
        self.enable_gzip && entry.size > GZIP_MIN_SIZE && mime::is_compressible(entry.content_type)
    }

    /// Append `?mtime=<ms>` to a path so each file revision gets its own URL
    ///
    /// Uses the cached modification time when the path has been served;
    /// otherwise stats the mounts synchronously without touching the cache.
    /// Directory forms and paths that resolve to no file come back unchanged.
    pub fn cache_busted_path(&self, path: &str) -> String {
        let normalized = PosixPath::from_request(path);
        if normalized.is_directory() {
            return path.to_string();
        }
        let modified = match self.cache.get(&normalized.to_string()) {
            Some(entry) => Some(entry.modified),
            None => self.stat_first_match(&normalized),
        };

        match modified {
            Some(modified) => format!("{path}?mtime={}", cache::unix_millis(modified)),
            None => path.to_string(),
        }
    }

    /// Modification time of the first regular file the mounts hold for `path`
    fn stat_first_match(&self, path: &PosixPath) -> Option<SystemTime> {
        self.resolver
            .mounts()
            .iter()
            .filter_map(|mount| mount.relative(path).map(|rel| mount.root().join(&rel)))
            .find_map(|candidate| {
                std::fs::metadata(candidate.to_path_buf())
                    .ok()
                    .filter(std::fs::Metadata::is_file)
                    .and_then(|metadata| metadata.modified().ok())
            })
    }

    pub const fn cache(&self) -> &MetadataCache {
        &self.cache
    }
}

/// Current metadata of a cached entry's file, which must still be a regular file
async fn restat_file(entry: &CachedFile) -> io::Result<Metadata> {
    let metadata = tokio::fs::metadata(&entry.disk_path).await?;
    if metadata.is_file() {
        Ok(metadata)
    } else {
        Err(io::Error::other("no longer a regular file"))
    }
}
