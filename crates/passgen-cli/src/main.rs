//! CLI entry point for PassGen.
//!
//! This binary provides the `passgen` command with subcommands for creating
//! a key-list and generating, resetting and listing label passwords.

mod cli;
mod commands;
mod helpers;

use anyhow::{Context, Result};
use clap::Parser;
use passgen_core::PassgenConfig;
use tracing::debug;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    helpers::init_tracing(if cli.verbose { "debug" } else { "warn" });

    let meta_dir = match cli.meta_dir {
        Some(dir) => dir,
        None => helpers::default_meta_dir()?,
    };
    std::fs::create_dir_all(&meta_dir)
        .with_context(|| format!("failed to create {}", meta_dir.display()))?;

    let config = PassgenConfig::load(meta_dir);
    debug!(meta_dir = %config.meta_dir.display(), "configuration loaded");

    match cli.command {
        Commands::Init {
            iter_count,
            keylist_path,
            force,
        } => commands::cmd_init(&config, iter_count, keylist_path, force),
        Commands::Generate(args) => commands::cmd_generate(&config, args),
        Commands::Reset(args) => commands::cmd_reset(&config, args),
        Commands::List { keylist_path } => commands::cmd_list(&config, keylist_path),
    }
}
