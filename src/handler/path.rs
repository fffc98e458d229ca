//! POSIX path normalization
//!
//! Request paths and mount roots are normalized here instead of through
//! `std::path`, so behavior is identical on every host: `/` and `\` are both
//! separators, `.` segments vanish and `..` consumes the preceding segment.

use percent_encoding::percent_decode_str;
use std::fmt;
use std::path::PathBuf;

/// A normalized, forward-slash path
///
/// `..` segments that cannot be collapsed stay at the front, so a path that
/// climbs above its starting point is still visible as such.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosixPath {
    absolute: bool,
    segments: Vec<String>,
    directory: bool,
}

impl PosixPath {
    /// Normalize a raw path string
    ///
    /// # Examples
    /// ```
    /// use mountserve::handler::path::PosixPath;
    /// assert_eq!(PosixPath::parse("/a/./b/../c.txt").to_string(), "/a/c.txt");
    /// assert_eq!(PosixPath::parse("/../etc/passwd").to_string(), "/../etc/passwd");
    /// assert_eq!(PosixPath::parse("a\\b").to_string(), "a/b");
    /// ```
    pub fn parse(raw: &str) -> Self {
        let unified = raw.replace('\\', "/");
        let absolute = unified.starts_with('/');
        let last = unified.rsplit('/').next().unwrap_or_default();
        let directory = matches!(last, "" | "." | "..");

        let mut segments: Vec<String> = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => {}
                ".." => match segments.last().map(String::as_str) {
                    Some(prev) if prev != ".." => {
                        segments.pop();
                    }
                    _ => segments.push("..".to_string()),
                },
                other => segments.push(other.to_string()),
            }
        }

        Self {
            absolute,
            segments,
            directory,
        }
    }

    /// Percent-decode a request path and normalize it
    ///
    /// A path that does not decode to valid UTF-8 is normalized as sent.
    pub fn from_request(raw: &str) -> Self {
        let decoded = percent_decode_str(raw).decode_utf8();
        match decoded {
            Ok(path) => Self::parse(&path),
            Err(_) => Self::parse(raw),
        }
    }

    /// Whether the path names a directory rather than a file
    pub fn is_directory(&self) -> bool {
        self.directory || self.segments.is_empty()
    }

    /// Strip `prefix` on a segment boundary
    ///
    /// `/assets/x.png` minus `/assets` is `x.png`; `/assetsx/y` does not match.
    pub fn strip_prefix(&self, prefix: &Self) -> Option<Self> {
        let rest = self.segments.strip_prefix(prefix.segments.as_slice())?;
        Some(Self {
            absolute: false,
            segments: rest.to_vec(),
            directory: self.directory,
        })
    }

    /// Append `relative` to this path and normalize the result
    pub fn join(&self, relative: &Self) -> Self {
        let joined = format!("{}/{}", self, relative.segments.join("/"));
        Self::parse(&joined)
    }

    /// Whether `candidate` lies at or below this path
    ///
    /// The comparison is per segment, so `/srv/www` does not contain
    /// `/srv/www-private`. A candidate whose next segment after the root is
    /// `..` has climbed out of a root made only of `..` segments.
    pub fn contains(&self, candidate: &Self) -> bool {
        self.absolute == candidate.absolute
            && candidate.segments.starts_with(&self.segments)
            && candidate.segments.get(self.segments.len()).map(String::as_str) != Some("..")
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(self.to_string())
    }
}

impl fmt::Display for PosixPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.segments.join("/");
        match (self.absolute, body.is_empty()) {
            (true, _) => write!(f, "/{body}"),
            (false, true) => f.write_str("."),
            (false, false) => f.write_str(&body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_segments() {
        assert_eq!(PosixPath::parse("/a//b/./c").to_string(), "/a/b/c");
        assert_eq!(PosixPath::parse("/a/b/../../c").to_string(), "/c");
        assert_eq!(PosixPath::parse("./public").to_string(), "public");
        assert_eq!(PosixPath::parse(".").to_string(), ".");
    }

    #[test]
    fn test_leading_parent_segments_kept() {
        assert_eq!(PosixPath::parse("/../../x").to_string(), "/../../x");
        assert_eq!(PosixPath::parse("../a/../../b").to_string(), "../../b");
    }

    #[test]
    fn test_backslash_is_separator() {
        let path = PosixPath::parse("/img\\..\\..\\secret.txt");
        assert_eq!(path.to_string(), "/../secret.txt");
    }

    #[test]
    fn test_directory_detection() {
        assert!(PosixPath::parse("/").is_directory());
        assert!(PosixPath::parse("/docs/").is_directory());
        assert!(PosixPath::parse("/docs/.").is_directory());
        assert!(PosixPath::parse("/docs/a/..").is_directory());
        assert!(!PosixPath::parse("/docs/a.txt").is_directory());
    }

    #[test]
    fn test_percent_decoding() {
        let path = PosixPath::from_request("/hello%20world.txt");
        assert_eq!(path.to_string(), "/hello world.txt");

        let path = PosixPath::from_request("/%2e%2e/%2e%2e/etc/passwd");
        assert_eq!(path.to_string(), "/../../etc/passwd");

        // Invalid UTF-8 falls back to the raw path
        let path = PosixPath::from_request("/bad%ff.txt");
        assert_eq!(path.to_string(), "/bad%ff.txt");
    }

    #[test]
    fn test_strip_prefix() {
        let prefix = PosixPath::parse("/assets/");
        let stripped = PosixPath::parse("/assets/img/x.png").strip_prefix(&prefix);
        assert_eq!(stripped.map(|p| p.to_string()).as_deref(), Some("img/x.png"));

        assert!(PosixPath::parse("/assetsx/y.png").strip_prefix(&prefix).is_none());
        assert!(PosixPath::parse("/x.png").strip_prefix(&prefix).is_none());
    }

    #[test]
    fn test_contains() {
        let root = PosixPath::parse("/srv/www");
        assert!(root.contains(&root.join(&PosixPath::parse("a/b.txt"))));
        assert!(!root.contains(&root.join(&PosixPath::parse("../secret"))));
        assert!(!root.contains(&root.join(&PosixPath::parse("../www-private/x"))));

        let cwd = PosixPath::parse(".");
        assert!(cwd.contains(&cwd.join(&PosixPath::parse("a.txt"))));
        assert!(!cwd.contains(&cwd.join(&PosixPath::parse("../a.txt"))));

        let parent = PosixPath::parse("../public");
        assert!(parent.contains(&parent.join(&PosixPath::parse("x.css"))));
        assert!(!parent.contains(&parent.join(&PosixPath::parse("../../x.css"))));
    }
}
