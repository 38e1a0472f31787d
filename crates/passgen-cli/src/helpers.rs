//! Shared helper functions used across CLI subcommands.
//!
//! Includes tracing initialization, meta-directory and key-list path
//! resolution, and master password input.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use passgen_core::{PassgenConfig, RecentPaths};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable that supplies the master password non-interactively.
pub const MASTER_PASSWORD_ENV: &str = "PASSGEN_MASTER_PASSWORD";

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
///
/// Logs go to stderr so stdout carries only the derived password.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `~/.passgen`.
pub fn default_meta_dir() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().context("cannot determine home directory")?;
    Ok(dirs.home_dir().join(".passgen"))
}

/// Pick the key-list for a command that reads an existing file.
///
/// Order: the explicit path, the most recently used path, the default path.
pub fn resolve_keylist_path(config: &PassgenConfig, explicit: Option<PathBuf>) -> Result<PathBuf> {
    let path = match explicit {
        Some(p) => p,
        None => match config.recent_paths().most_recently_used()? {
            Some(p) => {
                debug!(path = %p.display(), "using most recently used key-list");
                p
            }
            None => config.default_keylist_path(),
        },
    };
    absolute(&path)
}

/// Make `path` absolute so the recent-paths history stays meaningful from
/// any working directory.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("invalid path {}", path.display()))
}

// ---------------------------------------------------------------------------
// Master password input
// ---------------------------------------------------------------------------

/// Read the master password from the environment or the terminal.
pub fn read_master_password() -> Result<String> {
    if let Ok(pw) = std::env::var(MASTER_PASSWORD_ENV) {
        debug!("master password taken from {MASTER_PASSWORD_ENV}");
        return Ok(pw);
    }
    rpassword::prompt_password("Master password: ").context("failed to read master password")
}

/// Read a new master password, asking twice when prompting.
pub fn read_new_master_password() -> Result<String> {
    if let Ok(pw) = std::env::var(MASTER_PASSWORD_ENV) {
        return Ok(pw);
    }

    let first =
        rpassword::prompt_password("Master password: ").context("failed to read master password")?;
    let second = rpassword::prompt_password("Repeat for confirmation: ")
        .context("failed to read master password")?;
    if first != second {
        bail!("the two entered values do not match");
    }
    Ok(first)
}
