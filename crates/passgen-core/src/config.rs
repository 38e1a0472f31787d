//! Meta-directory configuration.
//!
//! The meta directory holds the default key-list, the recent-paths history
//! and an optional `config.toml`.  Its location is always passed in by the
//! caller; this crate never looks at the home directory itself.
//!
//! ```toml
//! [passgen]
//! iter_count = 100000
//! gen_mode = "AlphaNum"
//! ```

use std::num::NonZeroU32;
use std::path::PathBuf;

use tracing::warn;

use crate::kdf::DEFAULT_ITERATIONS;
use crate::model::GenMode;
use crate::recent::FileRecentPaths;

/// File name of the optional settings file inside the meta directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// File name of the default key-list inside the meta directory.
pub const DEFAULT_KEYLIST_NAME: &str = "default.keys.json";

/// Settings resolved for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassgenConfig {
    /// Directory holding PassGen's own files.
    pub meta_dir: PathBuf,
    /// Iteration count offered when initializing a new master.
    pub default_iter_count: NonZeroU32,
    /// Mode given to newly created keys when the caller does not pick one.
    pub default_gen_mode: GenMode,
}

impl PassgenConfig {
    /// Built-in defaults rooted at `meta_dir`.
    pub fn new(meta_dir: impl Into<PathBuf>) -> Self {
        Self {
            meta_dir: meta_dir.into(),
            default_iter_count: DEFAULT_ITERATIONS,
            default_gen_mode: GenMode::default(),
        }
    }

    /// Defaults overlaid with the `[passgen]` table of
    /// `<meta_dir>/config.toml`.
    ///
    /// A missing file, an unparsable file or an absent key all fall back to
    /// the built-in value.
    pub fn load(meta_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::new(meta_dir);

        let path = config.config_file();
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return config,
        };

        let table: toml::Table = match content.parse() {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
                return config;
            }
        };

        let section = match table.get("passgen") {
            Some(toml::Value::Table(t)) => t,
            _ => return config,
        };

        if let Some(n) = section
            .get("iter_count")
            .and_then(|v| v.as_integer())
            .and_then(|v| u32::try_from(v).ok())
            .and_then(NonZeroU32::new)
        {
            config.default_iter_count = n;
        }

        if let Some(mode) = section
            .get("gen_mode")
            .and_then(|v| v.as_str())
            .and_then(GenMode::parse)
        {
            config.default_gen_mode = mode;
        }

        config
    }

    /// `<meta_dir>/config.toml`.
    pub fn config_file(&self) -> PathBuf {
        self.meta_dir.join(CONFIG_FILE_NAME)
    }

    /// `<meta_dir>/default.keys.json`.
    pub fn default_keylist_path(&self) -> PathBuf {
        self.meta_dir.join(DEFAULT_KEYLIST_NAME)
    }

    /// The recent-paths registry for this meta directory.
    pub fn recent_paths(&self) -> FileRecentPaths {
        FileRecentPaths::new(FileRecentPaths::default_path(&self.meta_dir))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::recent::RecentPaths;

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = PassgenConfig::load(dir.path());

        assert_eq!(config, PassgenConfig::new(dir.path()));
        assert_eq!(config.default_iter_count.get(), 1000);
        assert_eq!(config.default_gen_mode, GenMode::Base64);
        assert_eq!(
            config.default_keylist_path(),
            dir.path().join("default.keys.json")
        );
    }

    #[test]
    fn derived_paths_follow_meta_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PassgenConfig::new(dir.path());
        config.meta_dir = dir.path().join("elsewhere");

        assert_eq!(config.config_file(), dir.path().join("elsewhere/config.toml"));
        assert_eq!(
            config.default_keylist_path(),
            dir.path().join("elsewhere/default.keys.json")
        );
        config.recent_paths().record_use(Path::new("/k.json")).unwrap();
        assert!(dir.path().join("elsewhere/keylists.meta.json").exists());
    }

    #[test]
    fn file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[passgen]\niter_count = 5000\ngen_mode = \"alphanum\"\n",
        )
        .unwrap();

        let config = PassgenConfig::load(dir.path());
        assert_eq!(config.default_iter_count.get(), 5000);
        assert_eq!(config.default_gen_mode, GenMode::AlphaNum);
    }

    #[test]
    fn bad_values_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[passgen]\niter_count = 0\ngen_mode = \"hex\"\n",
        )
        .unwrap();

        assert_eq!(PassgenConfig::load(dir.path()), PassgenConfig::new(dir.path()));
    }

    #[test]
    fn unparsable_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[[[").unwrap();

        assert_eq!(PassgenConfig::load(dir.path()), PassgenConfig::new(dir.path()));
    }
}
