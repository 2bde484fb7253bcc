//! Version marker file: its change means new content is available.

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Observable state of the marker at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStamp {
    pub modified: SystemTime,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct VersionMarker {
    path: PathBuf,
}

impl VersionMarker {
    /// The path is canonicalized when possible so it compares equal to the
    /// paths reported by file watchers (symlinked marker files included).
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let path = fs::canonicalize(&path).unwrap_or(path);
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory to watch for marker changes
    pub fn watch_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Modification time, used as the feed-level "updated" stamp
    pub fn modified(&self) -> io::Result<DateTime<Utc>> {
        let modified = fs::metadata(&self.path)?.modified()?;
        Ok(DateTime::<Utc>::from(modified))
    }

    pub fn stamp(&self) -> io::Result<VersionStamp> {
        let modified = fs::metadata(&self.path)?.modified()?;
        let content = fs::read_to_string(&self.path)?.trim().to_string();
        Ok(VersionStamp { modified, content })
    }

    /// Whether a path reported by a watcher designates this marker
    pub fn is_marker(&self, candidate: &Path) -> bool {
        if candidate == self.path {
            return true;
        }
        fs::canonicalize(candidate)
            .map(|c| c == self.path)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_stamp_reflects_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("version");
        fs::write(&path, "1\n").unwrap();

        let marker = VersionMarker::new(&path);
        assert_eq!(marker.stamp().unwrap().content, "1");
        assert!(marker.modified().is_ok());

        fs::write(&path, "2\n").unwrap();
        assert_eq!(marker.stamp().unwrap().content, "2");
    }

    #[test]
    fn test_is_marker() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("version");
        fs::write(&path, "1").unwrap();
        fs::write(dir.path().join("other"), "1").unwrap();

        let marker = VersionMarker::new(&path);
        assert!(marker.is_marker(&path));
        assert!(marker.is_marker(marker.path()));
        assert!(!marker.is_marker(&dir.path().join("other")));
        assert_eq!(
            marker.watch_dir(),
            fs::canonicalize(dir.path()).unwrap().as_path()
        );
    }

    #[test]
    fn test_missing_marker_reports_io_error() {
        let marker = VersionMarker::new("/no/such/version");
        assert!(marker.modified().is_err());
        assert!(marker.stamp().is_err());
    }
}
