//! "Most recently used key-list" bookkeeping.
//!
//! The [`RecentPaths`] trait abstracts over where the history lives.
//! [`FileRecentPaths`] keeps it as `{"paths": [...]}` in
//! `<meta_dir>/keylists.meta.json`, oldest first, with no duplicates.
//!
//! The history is a convenience for picking a default path.  Lookups treat a
//! missing or unreadable history file as empty.  Recording a use fails if the
//! existing file cannot be read, since rewriting it would lose the history.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// File name of the history inside the meta directory.
pub const RECENT_FILE_NAME: &str = "keylists.meta.json";

/// Ordered, deduplicated history of key-list paths.
pub trait RecentPaths {
    /// Mark `path` as used, moving it to the most recent position.
    fn record_use(&self, path: &Path) -> Result<()>;

    /// The path passed to the latest [`record_use`](Self::record_use), if any.
    fn most_recently_used(&self) -> Result<Option<PathBuf>>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecentFile {
    #[serde(default)]
    paths: Vec<PathBuf>,
}

/// JSON-file backed [`RecentPaths`].
pub struct FileRecentPaths {
    file: PathBuf,
}

impl FileRecentPaths {
    /// Track history in `file`.  The file is created on first
    /// [`record_use`](RecentPaths::record_use).
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    /// Default location: `<meta_dir>/keylists.meta.json`.
    pub fn default_path(meta_dir: &Path) -> PathBuf {
        meta_dir.join(RECENT_FILE_NAME)
    }

    /// All recorded paths, oldest first.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.read().paths
    }

    /// Lenient read for lookups: any failure reads as empty history.
    fn read(&self) -> RecentFile {
        self.read_for_update().unwrap_or_else(|e| {
            warn!(path = %self.file.display(), error = %e, "cannot read key-list history");
            RecentFile::default()
        })
    }

    /// Read before rewriting.  A missing or malformed file is empty, but any
    /// other I/O failure is returned so the history is not clobbered.
    fn read_for_update(&self) -> std::io::Result<RecentFile> {
        let text = match std::fs::read_to_string(&self.file) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RecentFile::default()),
            Err(e) => return Err(e),
        };

        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(path = %self.file.display(), error = %e, "ignoring malformed key-list history");
            RecentFile::default()
        }))
    }
}

impl RecentPaths for FileRecentPaths {
    fn record_use(&self, path: &Path) -> Result<()> {
        let mut history = self.read_for_update()?;
        history.paths.retain(|p| p != path);
        history.paths.push(path.to_path_buf());

        if let Some(parent) = self.file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.file, serde_json::to_string(&history)?)?;

        debug!(path = %path.display(), entries = history.paths.len(), "recorded key-list use");
        Ok(())
    }

    fn most_recently_used(&self) -> Result<Option<PathBuf>> {
        Ok(self.read().paths.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (tempfile::TempDir, FileRecentPaths) {
        let dir = tempfile::tempdir().unwrap();
        let recent = FileRecentPaths::new(FileRecentPaths::default_path(dir.path()));
        (dir, recent)
    }

    #[test]
    fn empty_history() {
        let (_dir, recent) = registry();
        assert_eq!(recent.most_recently_used().unwrap(), None);
        assert!(recent.paths().is_empty());
    }

    #[test]
    fn latest_use_wins() {
        let (_dir, recent) = registry();
        recent.record_use(Path::new("/a.json")).unwrap();
        recent.record_use(Path::new("/b.json")).unwrap();

        assert_eq!(
            recent.most_recently_used().unwrap(),
            Some(PathBuf::from("/b.json"))
        );
    }

    #[test]
    fn reuse_moves_to_end_without_duplicates() {
        let (_dir, recent) = registry();
        for p in ["/a.json", "/b.json", "/c.json", "/a.json"] {
            recent.record_use(Path::new(p)).unwrap();
        }

        assert_eq!(
            recent.paths(),
            vec![
                PathBuf::from("/b.json"),
                PathBuf::from("/c.json"),
                PathBuf::from("/a.json"),
            ]
        );
    }

    #[test]
    fn file_format() {
        let (dir, recent) = registry();
        recent.record_use(Path::new("/x.json")).unwrap();

        let text = std::fs::read_to_string(dir.path().join(RECENT_FILE_NAME)).unwrap();
        assert_eq!(text, r#"{"paths":["/x.json"]}"#);
    }

    #[test]
    fn malformed_history_reads_as_empty() {
        let (dir, recent) = registry();
        std::fs::write(dir.path().join(RECENT_FILE_NAME), "[[[").unwrap();

        assert_eq!(recent.most_recently_used().unwrap(), None);

        recent.record_use(Path::new("/fresh.json")).unwrap();
        assert_eq!(recent.paths(), vec![PathBuf::from("/fresh.json")]);
    }

    #[test]
    fn unreadable_history_is_not_overwritten() {
        let (dir, recent) = registry();
        // A directory in place of the file fails to read with something
        // other than NotFound.
        let history = dir.path().join(RECENT_FILE_NAME);
        std::fs::create_dir(&history).unwrap();

        let err = recent.record_use(Path::new("/a.json")).unwrap_err();
        assert!(matches!(err, crate::error::PassgenError::Io(_)));
        assert!(history.is_dir());

        assert_eq!(recent.most_recently_used().unwrap(), None);
    }
}
