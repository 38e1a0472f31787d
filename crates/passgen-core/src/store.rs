//! Key-list file persistence.
//!
//! A key-list is always read and written whole.  Saving goes through a
//! temporary file in the target's directory that is then renamed over the
//! target, so a crash mid-write leaves either the old or the new content.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{PassgenError, Result};
use crate::model::{CURRENT_VERSION, KeyList};

/// Read and parse the key-list at `path`.
///
/// # Errors
///
/// [`PassgenError::NotFound`] if the file does not exist, and
/// [`PassgenError::Deserialization`] if its content is malformed, including
/// content that is not UTF-8 or not JSON.
pub fn load(path: &Path) -> Result<KeyList> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PassgenError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            return Err(PassgenError::Deserialization {
                field: "KeyList".into(),
                reason: format!("is not valid UTF-8: {e}"),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let list = KeyList::from_json(&text)?;

    if list.version > CURRENT_VERSION {
        warn!(
            path = %path.display(),
            version = list.version,
            supported = CURRENT_VERSION,
            "key-list was written by a newer version; unknown fields are preserved"
        );
    }

    debug!(path = %path.display(), keys = list.keys().len(), "loaded key-list");
    Ok(list)
}

/// Overwrite `path` with the serialized `list`.
///
/// The parent directory is created if needed.  On Unix the file is left
/// readable and writable by the owner only.
pub fn save(path: &Path, list: &KeyList) -> Result<()> {
    let json = list.to_json()?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    tmp.persist(path).map_err(|e| PassgenError::Io(e.error))?;

    info!(path = %path.display(), keys = list.keys().len(), "saved key-list");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::model::{GenMode, Key, Master};

    fn sample() -> KeyList {
        let master = Master::from_parts("aGFzaA==".into(), "c2FsdA==".into(), NonZeroU32::MIN);
        let mut list = KeyList::new(master);
        list.add_key(Key::new("one", GenMode::Base64, None)).unwrap();
        list
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.keys.json");

        save(&path, &sample()).unwrap();
        assert_eq!(load(&path).unwrap(), sample());
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/k.json");

        save(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_overwrites_fully() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("k.json");

        let mut big = sample();
        for i in 0..50 {
            big.add_key(Key::new(&format!("label-{i}"), GenMode::AlphaNum, None))
                .unwrap();
        }
        save(&path, &big).unwrap();
        save(&path, &sample()).unwrap();

        assert_eq!(load(&path).unwrap().keys().len(), 1);
        // No temp files left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does/not/exist.json");

        let err = load(&path).unwrap_err();
        assert!(matches!(err, PassgenError::NotFound { path: p } if p == path));
    }

    #[test]
    fn load_truncated_json_is_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"Master": {"Hash": "aA==""#).unwrap();

        assert!(matches!(
            load(&path).unwrap_err(),
            PassgenError::Deserialization { field, .. } if field == "KeyList"
        ));
    }

    #[test]
    fn load_non_utf8_is_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.json");
        std::fs::write(&path, [0xff, 0xfe, 0x7b]).unwrap();

        assert!(matches!(
            load(&path).unwrap_err(),
            PassgenError::Deserialization { field, .. } if field == "KeyList"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("k.json");
        save(&path, &sample()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
