//! Subcommand implementations.
//!
//! Each command resolves its key-list path, asks for the master password,
//! calls into `passgen_core` and writes the result.  The derived password is
//! the only thing printed to stdout.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use passgen_core::model::normalize_max_length;
use passgen_core::{KeyList, PassgenConfig, PassgenError, RecentPaths, engine, store};
use tracing::info;

use crate::cli::LabelArgs;
use crate::helpers::{
    absolute, read_master_password, read_new_master_password, resolve_keylist_path,
};

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

pub fn cmd_init(
    config: &PassgenConfig,
    iter_count: Option<NonZeroU32>,
    keylist_path: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let path = init_target(config, keylist_path)?;

    if path.exists() && !force {
        bail!(
            "a key-list already exists at {}; pass --force to overwrite it",
            path.display()
        );
    }

    let iterations = iter_count.unwrap_or(config.default_iter_count);
    let password = read_new_master_password()?;

    let list = engine::initialize_master(&password, iterations)?;
    save_and_record(config, &path, &list)?;

    info!(iterations = iterations.get(), "initialized new master");
    eprintln!("Saved new master hash at {}", path.display());
    Ok(())
}

/// Where `init` writes: the explicit path or the default, made absolute so
/// the recorded history does not depend on the working directory.
fn init_target(config: &PassgenConfig, keylist_path: Option<PathBuf>) -> Result<PathBuf> {
    absolute(&keylist_path.unwrap_or_else(|| config.default_keylist_path()))
}

// ---------------------------------------------------------------------------
// generate / reset
// ---------------------------------------------------------------------------

pub fn cmd_generate(config: &PassgenConfig, args: LabelArgs) -> Result<()> {
    let path = resolve_keylist_path(config, args.keylist_path)?;
    let mut list = load(&path)?;
    let password = read_master_password()?;

    let gen_mode = args.gen_mode.unwrap_or(config.default_gen_mode);
    let max_length = normalize_max_length(args.max_length);

    let out = engine::verify_and_derive(&mut list, &password, &args.label, gen_mode, max_length)
        .map_err(|e| reject(e, &path))?;

    if out.created {
        info!(label = %args.label.to_lowercase(), "added new label");
        save_and_record(config, &path, &list)?;
    } else {
        config.recent_paths().record_use(&path)?;
    }

    println!("{}", out.password);
    Ok(())
}

pub fn cmd_reset(config: &PassgenConfig, args: LabelArgs) -> Result<()> {
    let path = resolve_keylist_path(config, args.keylist_path)?;
    let mut list = load(&path)?;
    let password = read_master_password()?;

    let gen_mode = args.gen_mode.unwrap_or(config.default_gen_mode);
    let max_length = normalize_max_length(args.max_length);

    let out = engine::reset_label(&mut list, &password, &args.label, gen_mode, max_length)
        .map_err(|e| reject(e, &path))?;
    save_and_record(config, &path, &list)?;

    info!(label = %args.label.to_lowercase(), "reset label");
    println!("{}", out.password);
    Ok(())
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

pub fn cmd_list(config: &PassgenConfig, keylist_path: Option<PathBuf>) -> Result<()> {
    let path = resolve_keylist_path(config, keylist_path)?;
    let list = load(&path)?;
    let password = read_master_password()?;

    engine::ensure_master(&list, &password).map_err(|e| reject(e, &path))?;

    if list.keys().is_empty() {
        eprintln!("No labels in {}", path.display());
        return Ok(());
    }

    for key in list.keys() {
        let limit = key
            .max_length()
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string());
        println!("{:<32} {:<9} {}", key.label(), key.gen_mode(), limit);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

fn load(path: &Path) -> Result<KeyList> {
    match store::load(path) {
        Ok(list) => Ok(list),
        Err(PassgenError::NotFound { path }) => bail!(
            "no key-list at {}; run `passgen init` first or pass --keylist-path",
            path.display()
        ),
        Err(e) => Err(e).with_context(|| format!("failed to load {}", path.display())),
    }
}

fn save_and_record(config: &PassgenConfig, path: &Path, list: &KeyList) -> Result<()> {
    store::save(path, list).with_context(|| format!("failed to save {}", path.display()))?;
    config.recent_paths().record_use(path)?;
    Ok(())
}

fn reject(err: PassgenError, path: &Path) -> anyhow::Error {
    match err {
        PassgenError::MasterMismatch => anyhow::anyhow!(
            "master password does not match the value saved at {}",
            path.display()
        ),
        other => anyhow::Error::new(other).context(format!("cannot use {}", path.display())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
