//! Null-safe navigation over untyped provider JSON.
//!
//! Provider responses are deeply nested and sparsely populated. [`Node`] wraps an optional
//! reference into a [`serde_json::Value`] so that every step of a lookup chain succeeds and a
//! missing key anywhere simply yields `None` at the end:
//!
//! ```ignore
//! let album = Node::new(&body)
//!     .get("track")
//!     .get("sections")
//!     .at(0)
//!     .get("metadata")
//!     .find("title", "Album")
//!     .get("text")
//!     .string();
//! ```

use serde_json::Value;

/// A position inside a JSON document that may not exist.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(Option<&'a Value>);

impl<'a> Node<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(Some(value))
    }

    /// Object member lookup. `null` members count as missing.
    pub fn get(self, key: &str) -> Self {
        Self(self.0.and_then(|v| v.get(key)).filter(|v| !v.is_null()))
    }

    /// Array element lookup.
    pub fn at(self, index: usize) -> Self {
        Self(self.0.and_then(|v| v.get(index)).filter(|v| !v.is_null()))
    }

    /// First array element whose `key` member is the string `expected`.
    pub fn find(self, key: &str, expected: &str) -> Self {
        Self(self.items().find(|item| item.get(key).str() == Some(expected)).and_then(|n| n.0))
    }

    /// Iterate array elements; a missing node or non-array yields nothing.
    pub fn items(self) -> impl Iterator<Item = Node<'a>> {
        self.0
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|v| Node(Some(v)))
    }

    pub fn exists(self) -> bool {
        self.0.is_some()
    }

    pub fn str(self) -> Option<&'a str> {
        self.0.and_then(Value::as_str)
    }

    /// Text form of a scalar: strings as-is, numbers and booleans rendered.
    pub fn string(self) -> Option<String> {
        match self.0? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn u64(self) -> Option<u64> {
        self.0.and_then(Value::as_u64)
    }
}
