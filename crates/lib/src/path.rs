//! Path types for addressing locations inside a tracked tree.
//!
//! A [`Path`] is an ordered list of [`Key`]s leading from the root of a tracked
//! tree to one value. Map children are addressed by [`Key::Field`] and list
//! children by [`Key::Index`].
//!
//! # Usage
//!
//! ```rust
//! use recollect::path::{Key, Path};
//! use recollect::path;
//!
//! // Build incrementally
//! let built = Path::new().push("users").push(0).push("name");
//!
//! // Or with the macro
//! let literal = path!["users", 0, "name"];
//!
//! assert_eq!(built, literal);
//! assert_eq!(literal.to_string(), "users.0.name");
//! assert_eq!(literal.last(), Some(&Key::from("name")));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// One segment of a [`Path`].
///
/// Indices are signed: list positions handed to a proxy may count from the
/// end, and index adjustment can move a detached handle below zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// Position inside a list
    Index(i64),
    /// Key inside a map
    Field(String),
}

impl Key {
    /// Returns the index if this is a list position.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(index) => Some(*index),
            Key::Field(_) => None,
        }
    }

    /// Returns the field name if this is a map key.
    pub fn as_field(&self) -> Option<&str> {
        match self {
            Key::Field(name) => Some(name),
            Key::Index(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{index}"),
            Key::Field(name) => write!(f, "{name}"),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Field(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Field(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Field(name.clone())
    }
}

impl From<i32> for Key {
    fn from(index: i32) -> Self {
        Key::Index(index.into())
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index as i64)
    }
}

/// An owned path from the root of a tracked tree to one value.
///
/// The empty path addresses the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    keys: Vec<Key>,
}

impl Path {
    /// Creates a new empty (root) path.
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Creates a path from a sequence of keys.
    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Adds a key to the end of this path.
    pub fn push(mut self, key: impl Into<Key>) -> Self {
        self.keys.push(key.into());
        self
    }

    /// Returns a new path one level below this one.
    pub fn child(&self, key: impl Into<Key>) -> Path {
        self.clone().push(key)
    }

    /// Joins this path with another path.
    pub fn join(mut self, other: &Path) -> Self {
        self.keys.extend(other.keys.iter().cloned());
        self
    }

    /// Returns the keys of this path in root-to-leaf order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Returns the number of keys in the path.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if this is the root path.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the last key of the path, or `None` for the root.
    pub fn last(&self) -> Option<&Key> {
        self.keys.last()
    }

    /// Returns the parent path, or `None` if this is the root.
    pub fn parent(&self) -> Option<Path> {
        let (_, parent) = self.keys.split_last()?;
        Some(Path {
            keys: parent.to_vec(),
        })
    }

    /// Returns `true` if `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.keys.starts_with(&prefix.keys)
    }

    /// Returns `true` if this path lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &Path) -> bool {
        self.len() > ancestor.len() && self.starts_with(ancestor)
    }

    /// Returns the keys that follow `prefix`, or `None` if `prefix` does not
    /// lead to this path.
    pub fn strip_prefix(&self, prefix: &Path) -> Option<&[Key]> {
        self.keys.strip_prefix(prefix.keys.as_slice())
    }

    /// Replaces the key at `depth`. Out-of-range depths are ignored.
    pub(crate) fn replace_key(&mut self, depth: usize, key: Key) {
        if let Some(slot) = self.keys.get_mut(depth) {
            *slot = key;
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl AsRef<[Key]> for Path {
    fn as_ref(&self) -> &[Key] {
        &self.keys
    }
}

impl From<Vec<Key>> for Path {
    fn from(keys: Vec<Key>) -> Self {
        Self { keys }
    }
}

impl FromIterator<Key> for Path {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self::from_keys(iter)
    }
}

/// Builds a [`Path`] from a list of keys.
///
/// String-like arguments become [`Key::Field`], integers become [`Key::Index`].
///
/// ```rust
/// use recollect::path;
/// use recollect::path::Key;
///
/// let p = path!["nested", 0];
/// assert_eq!(p.keys(), &[Key::from("nested"), Key::Index(0)]);
/// assert!(path![].is_empty());
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::path::Path::new()
    };
    ($($key:expr),+ $(,)?) => {
        $crate::path::Path::from_keys([$($crate::path::Key::from($key)),+])
    };
}
