//! CLI argument definitions for PassGen.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use passgen_core::GenMode;

/// PassGen -- deterministic passwords from one master password.
#[derive(Parser)]
#[command(
    name = "passgen",
    version,
    about = "Generate passwords deterministically from a master password",
    long_about = "Derives a password per label from a single master password. Only a \
                  verifier of the master password and the list of labels are stored."
)]
pub struct Cli {
    /// Directory for PassGen's own files (default: ~/.passgen).
    #[arg(long, global = true, env = "PASSGEN_HOME")]
    pub meta_dir: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new key-list protected by a master password.
    Init {
        /// PBKDF2 iteration count (default from config, else 1000).
        #[arg(long, short)]
        iter_count: Option<NonZeroU32>,

        /// Where to write the key-list (default: <meta-dir>/default.keys.json).
        #[arg(long, short)]
        keylist_path: Option<PathBuf>,

        /// Overwrite an existing key-list without asking.
        #[arg(long)]
        force: bool,
    },

    /// Print the password for a label, adding the label if it is new.
    Generate(LabelArgs),

    /// Forget a label's settings and generate it again.
    Reset(LabelArgs),

    /// List stored labels and their settings.
    List {
        /// Key-list to read (default: most recently used).
        #[arg(long, short)]
        keylist_path: Option<PathBuf>,
    },
}

/// Options shared by `generate` and `reset`.
#[derive(Args)]
pub struct LabelArgs {
    /// Case-insensitive label for the password.
    #[arg(long, short)]
    pub label: String,

    /// Output alphabet for a new label: base64 or alphanum.
    #[arg(long, short)]
    pub gen_mode: Option<GenMode>,

    /// Maximum length for a new label; zero or negative means unlimited.
    #[arg(long, short, allow_hyphen_values = true)]
    pub max_length: Option<i64>,

    /// Key-list to use (default: most recently used).
    #[arg(long, short)]
    pub keylist_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate() {
        let cli = Cli::parse_from([
            "passgen", "generate", "-l", "GitHub", "-g", "alphanum", "-m", "-1",
        ]);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.label, "GitHub");
                assert_eq!(args.gen_mode, Some(GenMode::AlphaNum));
                assert_eq!(args.max_length, Some(-1));
                assert!(args.keylist_path.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn parse_init_with_global_meta_dir() {
        let cli = Cli::parse_from(["passgen", "init", "-i", "5000", "--meta-dir", "/tmp/pg"]);
        assert_eq!(cli.meta_dir, Some(PathBuf::from("/tmp/pg")));
        match cli.command {
            Commands::Init {
                iter_count, force, ..
            } => {
                assert_eq!(iter_count.map(NonZeroU32::get), Some(5000));
                assert!(!force);
            }
            _ => panic!("expected init"),
        }
    }

    #[test]
    fn zero_iterations_rejected() {
        assert!(Cli::try_parse_from(["passgen", "init", "-i", "0"]).is_err());
    }
}
