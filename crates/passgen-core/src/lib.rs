//! Deterministic per-label passwords from a single master password.
//!
//! Nothing secret is stored.  A key-list file holds a PBKDF2 verifier of the
//! master password and a list of labels; each password is recomputed on
//! demand as `HMAC-SHA256(master, label)`, base64 encoded and optionally
//! filtered and truncated.
//!
//! # Modules
//!
//! - [`codec`] — base64 text encoding.
//! - [`kdf`] — PBKDF2-HMAC-SHA256 master hash, salts, verification.
//! - [`derive`] — per-label password derivation.
//! - [`model`] — key-list data model and JSON format.
//! - [`engine`] — initialize / derive / reset operations.
//! - [`store`] — key-list file load and save.
//! - [`recent`] — most recently used key-list history.
//! - [`config`] — meta-directory settings.
//! - [`error`] — unified error type.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::num::NonZeroU32;
//! use std::path::Path;
//!
//! use passgen_core::{engine, store, GenMode};
//!
//! # fn example() -> passgen_core::Result<()> {
//! let path = Path::new("default.keys.json");
//!
//! // Once: create the verifier.
//! let list = engine::initialize_master("my master", NonZeroU32::new(100_000).unwrap())?;
//! store::save(path, &list)?;
//!
//! // Later: derive the password for a label.
//! let mut list = store::load(path)?;
//! let out = engine::verify_and_derive(&mut list, "my master", "github.com", GenMode::AlphaNum, None)?;
//! if out.created {
//!     store::save(path, &list)?;
//! }
//! println!("{}", out.password);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod derive;
pub mod engine;
pub mod error;
pub mod kdf;
pub mod model;
pub mod recent;
pub mod store;

// Re-export the most commonly used types at the crate root for convenience.
pub use config::PassgenConfig;
pub use engine::Derivation;
pub use error::{PassgenError, Result};
pub use model::{GenMode, Key, KeyList, Master};
pub use recent::{FileRecentPaths, RecentPaths};
