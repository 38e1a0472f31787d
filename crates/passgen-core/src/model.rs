//! Key-list data model and its JSON representation.
//!
//! A [`KeyList`] is the unit of persistence: one [`Master`] verifier, a format
//! version and an ordered list of [`Key`] records.  The on-disk shape is:
//!
//! ```text
//! { "Master": {"Hash": "<base64>", "Salt": "<base64>", "IterCount": 1000},
//!   "Version": 1,
//!   "Keys": [ {"Label": "site", "GenMode": "Base64", "MaxLength": null} ] }
//! ```
//!
//! Field names and casing are fixed.  Fields this version does not know about
//! are kept in an `extra` map on the owning record and written back verbatim,
//! so a file produced by a newer writer survives a load/save cycle.
//!
//! Deserialization walks the JSON tree by hand instead of deriving
//! `Deserialize`, so that a missing or mistyped field is reported by name in
//! [`PassgenError::Deserialization`].

use std::fmt;
use std::num::{NonZeroU32, NonZeroUsize};
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{PassgenError, Result};

/// Format version written by this crate.
pub const CURRENT_VERSION: i64 = 1;

// ═══════════════════════════════════════════════════════════════════════
//  GenMode
// ═══════════════════════════════════════════════════════════════════════

/// Output alphabet policy for a derived password.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum GenMode {
    /// The raw base64 text of the digest.
    #[default]
    Base64,
    /// Base64 text with every non-alphanumeric character removed.
    AlphaNum,
}

impl GenMode {
    /// Canonical name as written to the key-list file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base64 => "Base64",
            Self::AlphaNum => "AlphaNum",
        }
    }

    /// Parse a mode name, ignoring ASCII case.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("base64") {
            Some(Self::Base64)
        } else if s.eq_ignore_ascii_case("alphanum") {
            Some(Self::AlphaNum)
        } else {
            None
        }
    }
}

impl fmt::Display for GenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for GenMode {
    type Err = PassgenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            PassgenError::InvalidArgument(format!(
                "unknown gen mode `{s}` (expected Base64 or AlphaNum)"
            ))
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Labels and lengths
// ═══════════════════════════════════════════════════════════════════════

/// Normalize a user-supplied label for storage and lookup.
pub fn normalize_label(label: &str) -> String {
    label.to_lowercase()
}

/// Map a signed length to the canonical "unlimited" sentinel.
///
/// `None`, zero and negative values all mean "no limit" and become `None`;
/// this mirrors the `-1 = unlimited` convention used when prompting.
pub fn normalize_max_length(value: Option<i64>) -> Option<NonZeroUsize> {
    value
        .filter(|n| *n > 0)
        .and_then(|n| usize::try_from(n).ok())
        .and_then(NonZeroUsize::new)
}

// ═══════════════════════════════════════════════════════════════════════
//  Master
// ═══════════════════════════════════════════════════════════════════════

/// Verifiable fingerprint of the master password.
///
/// `hash` is always the PBKDF2 output of some password under `salt` and
/// `iter_count`.  The password itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Master {
    /// Base64 PBKDF2-HMAC-SHA256 output.
    #[serde(rename = "Hash")]
    pub hash: String,
    /// Base64 salt.
    #[serde(rename = "Salt")]
    pub salt: String,
    /// PBKDF2 iteration count.
    #[serde(rename = "IterCount")]
    pub iter_count: NonZeroU32,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Master {
    /// Assemble a record from already-encoded parts.
    pub fn from_parts(hash: String, salt: String, iter_count: NonZeroU32) -> Self {
        Self {
            hash,
            salt,
            iter_count,
            extra: Map::new(),
        }
    }

    fn from_object(mut obj: Map<String, Value>) -> Result<Self> {
        let hash = take_string(&mut obj, "Hash")?;
        let salt = take_string(&mut obj, "Salt")?;
        let raw = take(&mut obj, "IterCount")?
            .as_u64()
            .ok_or_else(|| PassgenError::field("IterCount", "must be a positive integer"))?;
        let iter_count = u32::try_from(raw)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                PassgenError::field("IterCount", format!("{raw} is out of range 1..=2^32-1"))
            })?;

        Ok(Self {
            hash,
            salt,
            iter_count,
            extra: obj,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Key
// ═══════════════════════════════════════════════════════════════════════

/// One derivable password slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Key {
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "GenMode")]
    gen_mode: GenMode,
    #[serde(rename = "MaxLength")]
    max_length: Option<NonZeroUsize>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Key {
    /// Create a key.  The label is lowercased.
    pub fn new(label: &str, gen_mode: GenMode, max_length: Option<NonZeroUsize>) -> Self {
        Self {
            label: normalize_label(label),
            gen_mode,
            max_length,
            extra: Map::new(),
        }
    }

    /// The stored label.  Derivation hashes exactly these bytes.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn gen_mode(&self) -> GenMode {
        self.gen_mode
    }

    /// `None` means unlimited.
    pub fn max_length(&self) -> Option<NonZeroUsize> {
        self.max_length
    }

    // Labels are kept verbatim here: re-casing a stored label would change
    // the password derived from it.
    fn from_value(value: Value) -> Result<Self> {
        let mut obj = into_object(value, "Keys")?;
        let label = take_string(&mut obj, "Label")?;

        let mode = take_string(&mut obj, "GenMode")?;
        let gen_mode = GenMode::parse(&mode)
            .ok_or_else(|| PassgenError::field("GenMode", format!("unknown mode `{mode}`")))?;

        let max_length = match take(&mut obj, "MaxLength")? {
            Value::Null => None,
            Value::Number(n) => {
                let n = n
                    .as_i64()
                    .ok_or_else(|| PassgenError::field("MaxLength", "must be an integer"))?;
                normalize_max_length(Some(n))
            }
            _ => return Err(PassgenError::field("MaxLength", "must be an integer or null")),
        };

        Ok(Self {
            label,
            gen_mode,
            max_length,
            extra: obj,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  KeyList
// ═══════════════════════════════════════════════════════════════════════

/// The master verifier plus every known label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyList {
    #[serde(rename = "Master")]
    pub master: Master,
    #[serde(rename = "Version")]
    pub version: i64,
    #[serde(rename = "Keys")]
    keys: Vec<Key>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl KeyList {
    /// A fresh key-list at [`CURRENT_VERSION`] with no keys.
    pub fn new(master: Master) -> Self {
        Self {
            master,
            version: CURRENT_VERSION,
            keys: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Parse a key-list from its JSON text.
    ///
    /// # Errors
    ///
    /// [`PassgenError::Deserialization`] naming the field for a missing or
    /// mistyped field, or naming `KeyList` when the text is not JSON at all.
    /// A missing `Keys` array is read as empty.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| PassgenError::field("KeyList", format!("is not valid JSON: {e}")))?;
        let mut root = into_object(value, "KeyList")?;

        let master = match take(&mut root, "Master")? {
            Value::Object(obj) => Master::from_object(obj)?,
            _ => return Err(PassgenError::field("Master", "must be an object")),
        };

        let version = take(&mut root, "Version")?
            .as_i64()
            .ok_or_else(|| PassgenError::field("Version", "must be an integer"))?;

        let keys = match root.remove("Keys") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(Key::from_value)
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(PassgenError::field("Keys", "must be an array")),
        };

        Ok(Self {
            master,
            version,
            keys,
            extra: root,
        })
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Stored labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(Key::label)
    }

    /// Find the first key whose stored label equals the lowercased `label`.
    pub fn get_key(&self, label: &str) -> Option<&Key> {
        let wanted = normalize_label(label);
        self.keys.iter().find(|k| k.label == wanted)
    }

    /// Remove every key whose stored label equals the lowercased `label`.
    ///
    /// Returns the number of keys removed; duplicates are all dropped.
    pub fn remove_key(&mut self, label: &str) -> usize {
        let wanted = normalize_label(label);
        let before = self.keys.len();
        self.keys.retain(|k| k.label != wanted);
        before - self.keys.len()
    }

    /// Append `key`, rejecting a label that is already present.
    pub fn add_key(&mut self, key: Key) -> Result<()> {
        if self.get_key(&key.label).is_some() {
            return Err(PassgenError::DuplicateLabel { label: key.label });
        }
        self.keys.push(key);
        Ok(())
    }

    /// Return the key for `label`, appending a new one with the given
    /// settings if none exists.  The flag is `true` when a key was created.
    pub fn get_or_create(
        &mut self,
        label: &str,
        gen_mode: GenMode,
        max_length: Option<NonZeroUsize>,
    ) -> (&Key, bool) {
        let wanted = normalize_label(label);
        match self.keys.iter().position(|k| k.label == wanted) {
            Some(idx) => (&self.keys[idx], false),
            None => {
                self.keys.push(Key::new(&wanted, gen_mode, max_length));
                let last = self.keys.len() - 1;
                (&self.keys[last], true)
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  JSON helpers
// ═══════════════════════════════════════════════════════════════════════

fn into_object(value: Value, what: &str) -> Result<Map<String, Value>> {
    match value {
        Value::Object(obj) => Ok(obj),
        _ => Err(PassgenError::field(what, "must be an object")),
    }
}

fn take(obj: &mut Map<String, Value>, field: &str) -> Result<Value> {
    obj.remove(field)
        .ok_or_else(|| PassgenError::field(field, "is missing"))
}

fn take_string(obj: &mut Map<String, Value>, field: &str) -> Result<String> {
    match take(obj, field)? {
        Value::String(s) => Ok(s),
        _ => Err(PassgenError::field(field, "must be a string")),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════
