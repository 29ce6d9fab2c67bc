//! Shared, string-keyed map container.

use std::{cell::RefCell, cmp::Ordering, collections::BTreeMap, fmt, rc::Rc};

use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};

use super::Value;

/// A string-keyed map of [`Value`]s.
///
/// `Map` is a handle: cloning it aliases the same storage, so a map stored
/// inside another container, held by a caller, and referenced from an
/// action log entry is one object. Use [`Map::deep_clone`] for an
/// independent copy. Keys enumerate in sorted order.
///
/// ```
/// # use recollect::value::Map;
/// let map = Map::new();
/// let alias = map.clone();
/// alias.insert("name", "Alice");
/// assert_eq!(map.get("name"), Some("Alice".into()));
///
/// let copy = map.deep_clone();
/// copy.insert("name", "Bob");
/// assert_eq!(map.get("name"), Some("Alice".into()));
/// ```
#[derive(Clone, Default)]
pub struct Map {
    entries: Rc<RefCell<BTreeMap<String, Value>>>,
}

impl Map {
    /// Creates a new empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Returns true if the map contains the given key
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Returns the value stored under `key`.
    ///
    /// Container values come back as handles to the stored container.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    /// Stores a value, returning the one it replaced.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.borrow_mut().insert(key.into(), value.into())
    }

    /// Removes a key, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries.borrow_mut().remove(key)
    }

    /// Returns the keys in stored order
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Returns a snapshot of all entries in stored order
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns true if both handles point at the same storage
    pub fn ptr_eq(&self, other: &Map) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    /// Recursively copies this map and every container below it.
    pub fn deep_clone(&self) -> Map {
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.deep_clone()))
            .collect()
    }

    /// Total ordering over maps: entry by entry, key first.
    pub fn compare(&self, other: &Map) -> Ordering {
        if self.ptr_eq(other) {
            return Ordering::Equal;
        }
        let left = self.entries.borrow();
        let right = other.entries.borrow();
        left.iter()
            .zip(right.iter())
            .map(|((lk, lv), (rk, rv))| lk.cmp(rk).then_with(|| lv.compare(rv)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| left.len().cmp(&right.len()))
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.entries.borrow() == *other.entries.borrow()
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.borrow().iter()).finish()
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.entries.borrow().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key:?}: {value}")?;
        }
        f.write_str("}")
    }
}

impl<K, V> FromIterator<(K, V)> for Map
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<BTreeMap<_, _>>();
        Self {
            entries: Rc::new(RefCell::new(entries)),
        }
    }
}

impl Serialize for Map {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries.borrow();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Map {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
