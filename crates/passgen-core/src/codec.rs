//! Base64 text encoding for salts, hashes and derived passwords.
//!
//! Everything binary that ends up in a key-list file goes through the
//! standard, padded alphabet (`A-Z a-z 0-9 + /` and `=`).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Encode `bytes` as standard padded base64.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    BASE64.encode(bytes)
}

/// Decode standard padded base64 text.
pub fn decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    BASE64.decode(text)
}

/// Whether `c` belongs to the alphabet produced by [`encode`].
pub fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}
