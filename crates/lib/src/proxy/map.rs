//! Tracked view of a [`Map`].

use std::fmt;

use super::{MapOps, Tracked};
use crate::{
    Result,
    path::{Key, Path},
    tracker::Recorder,
    value::{ContainerError, Map, Value},
};

/// A [`Map`] whose mutations are recorded.
///
/// - `set` of a missing key records `create`; of a present key with a
///   different value, `edit`; of an equal value, nothing.
/// - `delete` records `remove`.
/// - `get` wraps the child in a new proxy, unless the child has a pending
///   write, in which case the raw value comes back.
#[derive(Clone)]
pub struct MapProxy {
    map: Map,
    recorder: Recorder,
}

impl MapProxy {
    pub(crate) fn new(map: Map, recorder: Recorder) -> Self {
        Self { map, recorder }
    }

    /// The current path of this map in the tree.
    pub fn path(&self) -> Path {
        self.recorder.path()
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// The underlying map. Writes through it are not recorded.
    pub fn as_map(&self) -> &Map {
        &self.map
    }

    /// The underlying map as a value handle.
    pub fn to_value(&self) -> Value {
        Value::Map(self.map.clone())
    }

    /// Every entry, children wrapped as by [`MapOps::get`].
    pub fn items(&self) -> Vec<(String, Tracked)> {
        self.map
            .entries()
            .into_iter()
            .map(|(key, value)| {
                let child = self.child(&key, value);
                (key, child)
            })
            .collect()
    }

    fn child(&self, key: &str, value: Value) -> Tracked {
        let key = Key::from(key);
        if self.recorder.is_pending(&key) {
            return Tracked::Value(value);
        }
        self.recorder.track_child(value, key)
    }
}

impl MapOps for MapProxy {
    type Item = Tracked;

    fn get(&self, key: &str) -> Result<Tracked> {
        let value = self.map.get(key).ok_or_else(|| ContainerError::KeyNotFound {
            key: key.to_string(),
        })?;
        Ok(self.child(key, value))
    }

    fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let field = Key::from(&key);
        if !self.recorder.is_private(&field) {
            match self.map.get(&key) {
                None => self.recorder.create(field, value.clone()),
                Some(was) if !was.is_equivalent(&value) => self.recorder.edit(field, value.clone(), was),
                Some(_) => {}
            }
        }
        self.map.insert(key, value);
    }

    fn delete(&self, key: &str) -> Result<Value> {
        let was = self.map.remove(key).ok_or_else(|| ContainerError::KeyNotFound {
            key: key.to_string(),
        })?;
        self.recorder.remove(Key::from(key), was.clone());
        Ok(was)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.map.keys()
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

impl fmt::Debug for MapProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapProxy")
            .field("path", &self.path())
            .field("map", &self.map)
            .finish()
    }
}
