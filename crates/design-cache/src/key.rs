//! Slot addressing.

use serde::{Deserialize, Serialize};

/// Longest accepted group or key, in bytes.
const MAX_PART_LEN: usize = 200;

/// The addressable unit of caching: a key inside a group.
///
/// Groups are slash-separated namespaces such as `db/design/static`; keys are
/// flat identifiers such as `ads160600true`. Both are restricted to
/// `[A-Za-z0-9_./-]`, must be non-empty, and may not contain `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    group: String,
    key: String,
}

impl SlotKey {
    /// Validate and build a slot key. Returns `None` for malformed input.
    pub fn new(group: &str, key: &str) -> Option<Self> {
        if !is_valid_part(group) || !is_valid_part(key) || key.contains('/') {
            return None;
        }
        Some(Self {
            group: group.to_string(),
            key: key.to_string(),
        })
    }

    /// The group namespace.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The key within the group.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Flat string form used by key-value backends.
    pub fn as_storage_key(&self) -> String {
        format!("{}:{}", self.group, self.key)
    }

    /// Parse the flat form produced by [`SlotKey::as_storage_key`].
    pub fn from_storage_key(s: &str) -> Option<Self> {
        let (group, key) = s.rsplit_once(':')?;
        Self::new(group, key)
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.group, self.key)
    }
}

fn is_valid_part(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_PART_LEN
        && !s.contains("..")
        && !s.starts_with('/')
        && !s.ends_with('/')
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'/' | b'-'))
}

/// Build a content key by concatenating a prefix with its distinguishing
/// parameters.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("ads", 160, 600, true);
/// // Returns "ads160600true"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr $(, $part:expr)* $(,)?) => {{
        let mut key = String::from($prefix);
        $(
            key.push_str(&$part.to_string());
        )*
        key
    }};
}
