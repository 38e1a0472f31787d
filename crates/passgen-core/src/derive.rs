//! Per-label password derivation.
//!
//! A password is `HMAC-SHA256(key = master password, msg = label)`, base64
//! encoded, then optionally filtered to alphanumerics and finally truncated.
//! The order filter-then-truncate is part of the output contract: swapping it
//! would change every `AlphaNum` password with a length limit.

use ring::hmac;

use crate::codec;
use crate::model::{GenMode, Key};

/// Derive the password for `key` from `master_password`.
///
/// Pure and deterministic.  An empty label is hashed like any other string.
/// A length limit larger than the available text returns the whole text.
pub fn derive(master_password: &str, key: &Key) -> String {
    let mac_key = hmac::Key::new(hmac::HMAC_SHA256, master_password.as_bytes());
    let tag = hmac::sign(&mac_key, key.label().as_bytes());

    let mut text = codec::encode(tag.as_ref());

    if key.gen_mode() == GenMode::AlphaNum {
        text.retain(|c| c.is_ascii_alphanumeric());
    }

    // base64 output is ASCII, so byte and char positions coincide.
    if let Some(max) = key.max_length() {
        text.truncate(max.get().min(text.len()));
    }

    text
}
