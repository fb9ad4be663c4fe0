//! Chunk identifiers and resolved chunk entries.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A value a chunk loader may be called with.
///
/// Identity is the textual `content` alone: `ChunkId::quoted("1")` and `ChunkId::bare("1")` are
/// the same set member. `quoted` only records whether the originating literal was a string
/// token, and decides how the id is rendered back into JavaScript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkId {
    pub content: String,
    pub quoted: bool,
}

impl ChunkId {
    pub fn new(content: impl Into<String>, quoted: bool) -> Self {
        Self {
            content: content.into(),
            quoted,
        }
    }

    /// An id that came from a string literal.
    pub fn quoted(content: impl Into<String>) -> Self {
        Self::new(content, true)
    }

    /// An id that came from a number or other non-string token.
    pub fn bare(content: impl Into<String>) -> Self {
        Self::new(content, false)
    }

    /// The id as a JavaScript expression: a string literal when quoted, verbatim otherwise.
    pub fn to_js(&self) -> String {
        if self.quoted {
            serde_json::to_string(&self.content).unwrap_or_else(|_| format!("\"{}\"", self.content))
        } else {
            self.content.clone()
        }
    }
}

impl PartialEq for ChunkId {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl Eq for ChunkId {}

impl Hash for ChunkId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.content.hash(state);
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js())
    }
}

/// A chunk id together with the file name its loader produced for it.
///
/// Unlike [`ChunkId`], equality is structural and includes the id's quoting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkEntry {
    pub id: ChunkId,
    pub file: String,
}

impl ChunkEntry {
    pub fn new(id: ChunkId, file: impl Into<String>) -> Self {
        Self {
            id,
            file: file.into(),
        }
    }
}

impl PartialEq for ChunkEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id.content == other.id.content
            && self.id.quoted == other.id.quoted
            && self.file == other.file
    }
}

impl Eq for ChunkEntry {}

impl Hash for ChunkEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.content.hash(state);
        self.id.quoted.hash(state);
        self.file.hash(state);
    }
}

impl fmt::Display for ChunkEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.file)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use indexmap::IndexSet;
    use proptest::prelude::*;

    use super::*;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_quoting_does_not_affect_identity() {
        let quoted = ChunkId::quoted("1");
        let bare = ChunkId::bare("1");
        assert_eq!(quoted, bare);
        assert_eq!(hash_of(&quoted), hash_of(&bare));
        assert_ne!(ChunkId::bare("1"), ChunkId::bare("2"));
    }

    #[test]
    fn test_first_inserted_representative_is_kept() {
        let mut ids = IndexSet::new();
        ids.insert(ChunkId::bare("7"));
        ids.insert(ChunkId::quoted("7"));
        assert_eq!(ids.len(), 1);
        assert!(!ids[0].quoted);
    }

    #[test]
    fn test_rendering() {
        assert_eq!(ChunkId::bare("42").to_string(), "42");
        assert_eq!(ChunkId::quoted("vendors~main").to_string(), "\"vendors~main\"");
        assert_eq!(ChunkId::quoted("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(
            ChunkEntry::new(ChunkId::quoted("home"), "home.3f2a.js").to_string(),
            "\"home\": home.3f2a.js"
        );
    }

    #[test]
    fn test_entry_equality_includes_quoting() {
        let a = ChunkEntry::new(ChunkId::bare("1"), "1.js");
        let b = ChunkEntry::new(ChunkId::quoted("1"), "1.js");
        assert_ne!(a, b);
        assert_eq!(a, ChunkEntry::new(ChunkId::bare("1"), "1.js"));
    }

    proptest! {
        #[test]
        fn prop_identity_ignores_quoting(content in ".*", left: bool, right: bool) {
            let a = ChunkId::new(content.clone(), left);
            let b = ChunkId::new(content, right);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        }

        #[test]
        fn prop_distinct_contents_differ(a in "[a-z0-9]{1,8}", b in "[a-z0-9]{1,8}") {
            prop_assume!(a != b);
            prop_assert_ne!(ChunkId::bare(a), ChunkId::bare(b));
        }
    }
}
