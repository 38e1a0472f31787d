//! Outward operations composed from the KDF, derivation and model layers.
//!
//! These are what a front end calls: build a new key-list, derive the
//! password for a label, or reset a label.  None of them touch the
//! filesystem; persisting the updated [`KeyList`] is left to the caller
//! (see [`crate::store`]).

use std::num::{NonZeroU32, NonZeroUsize};

use crate::derive::derive;
use crate::error::{PassgenError, Result};
use crate::kdf;
use crate::model::{GenMode, KeyList};

/// Result of a successful derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    /// The derived password.
    pub password: String,
    /// `true` if a new key record was appended to the key-list.
    pub created: bool,
}

/// Start a new key-list for `master_password`.
///
/// Re-initializing means calling this again and replacing the old list.
pub fn initialize_master(master_password: &str, iterations: NonZeroU32) -> Result<KeyList> {
    let master = kdf::create_master(master_password, iterations)?;
    Ok(KeyList::new(master))
}

/// Fail with [`PassgenError::MasterMismatch`] unless `master_password`
/// matches the key-list's master record.
pub fn ensure_master(list: &KeyList, master_password: &str) -> Result<()> {
    if kdf::verify(master_password, &list.master)? {
        Ok(())
    } else {
        Err(PassgenError::MasterMismatch)
    }
}

/// Verify `master_password`, then derive the password for `label`.
///
/// An unseen label gets a new key with `gen_mode` and `max_length`.  A known
/// label keeps its stored settings and the arguments are ignored.
pub fn verify_and_derive(
    list: &mut KeyList,
    master_password: &str,
    label: &str,
    gen_mode: GenMode,
    max_length: Option<NonZeroUsize>,
) -> Result<Derivation> {
    ensure_master(list, master_password)?;

    let (key, created) = list.get_or_create(label, gen_mode, max_length);
    Ok(Derivation {
        password: derive(master_password, key),
        created,
    })
}

/// Verify `master_password`, drop every key for `label` and derive a fresh
/// one with the given settings.
pub fn reset_label(
    list: &mut KeyList,
    master_password: &str,
    label: &str,
    gen_mode: GenMode,
    max_length: Option<NonZeroUsize>,
) -> Result<Derivation> {
    ensure_master(list, master_password)?;

    list.remove_key(label);
    let (key, created) = list.get_or_create(label, gen_mode, max_length);
    Ok(Derivation {
        password: derive(master_password, key),
        created,
    })
}
