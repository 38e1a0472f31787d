//! PassGen error types.
//!
//! Every public API in this crate returns [`PassgenError`] through the
//! [`Result`] alias.  Variants carry the field, path or label involved so the
//! caller can build a user-facing message without parsing strings.

use std::path::PathBuf;

/// Unified error type for key-list handling and password derivation.
#[derive(Debug, thiserror::Error)]
pub enum PassgenError {
    // -- Crypto errors ------------------------------------------------------
    /// A stored `Salt` or `Hash` could not be decoded.
    #[error("corrupt master record: field `{field}` {reason}")]
    CorruptRecord { field: &'static str, reason: String },

    /// The supplied master password does not match the stored hash.
    #[error("master password does not match")]
    MasterMismatch,

    /// The system CSPRNG failed to produce bytes.
    #[error("failed to generate random bytes")]
    RandomFailed,

    // -- Model errors -------------------------------------------------------
    /// A persisted key-list is missing a required field or has a bad value.
    #[error("invalid key-list: field `{field}` {reason}")]
    Deserialization { field: String, reason: String },

    /// A key with this label already exists in the key-list.
    #[error("label already exists: {label}")]
    DuplicateLabel { label: String },

    /// A caller-supplied value was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- Persistence errors -------------------------------------------------
    /// The key-list file does not exist.
    #[error("key-list not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// I/O error from the filesystem.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON syntax error or serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PassgenError {
    /// Build a [`PassgenError::Deserialization`] for `field`.
    pub(crate) fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Deserialization {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PassgenError>;
