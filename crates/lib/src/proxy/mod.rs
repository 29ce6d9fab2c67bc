//! Proxies: tracked views of maps and lists.
//!
//! A proxy wraps one container of the tree together with a
//! [`Recorder`](crate::tracker::Recorder). Reads go straight to the
//! container; child reads come back wrapped in proxies of their own;
//! mutations update the container and report to the recorder.
//!
//! The container contract is spelled out by two traits, [`MapOps`] and
//! [`ListOps`]. The proxies implement them, and so do the plain [`Map`] and
//! [`List`] handles, so the same code can drive a tracked and an untracked
//! tree:
//!
//! ```
//! use recollect::{ListOps, Tracker, value::{List, Value}};
//!
//! fn shuffle(list: &impl ListOps) -> recollect::Result<()> {
//!     list.append(4);
//!     list.insert(0, 0);
//!     list.pop(None)?;
//!     Ok(())
//! }
//!
//! let plain: List = [1, 2, 3].into_iter().collect();
//! let copy = plain.deep_clone();
//! let tracker = Tracker::new();
//! let tracked = tracker.track(copy.clone()).into_list()?;
//!
//! shuffle(&plain)?;
//! shuffle(&tracked)?;
//! assert_eq!(plain, copy);
//! assert_eq!(tracker.len(), 1); // append then pop of the same slot cancels
//! # Ok::<(), recollect::Error>(())
//! ```

use std::cmp::Ordering;

use crate::{
    Result,
    value::{ContainerError, List, Map, Shape, Value},
};

mod list;
mod map;

pub use list::ListProxy;
pub use map::MapProxy;

/// What a tracked read hands back.
#[derive(Debug, Clone)]
pub enum Tracked {
    /// A scalar, or a container the tracker does not wrap
    Value(Value),
    /// A tracked map
    Map(MapProxy),
    /// A tracked list
    List(ListProxy),
}

impl Tracked {
    /// Returns true if this is a proxy
    pub fn is_tracked(&self) -> bool {
        !matches!(self, Tracked::Value(_))
    }

    /// The shape of the underlying value
    pub fn shape(&self) -> Shape {
        match self {
            Tracked::Value(value) => value.shape(),
            Tracked::Map(_) => Shape::Map,
            Tracked::List(_) => Shape::List,
        }
    }

    pub fn as_map(&self) -> Option<&MapProxy> {
        match self {
            Tracked::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListProxy> {
        match self {
            Tracked::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the tracked map, or a type error for anything else.
    ///
    /// A raw map (one with a pending write) is an error too: mutate it
    /// through the value handle instead.
    pub fn into_map(self) -> Result<MapProxy> {
        match self {
            Tracked::Map(map) => Ok(map),
            other => Err(other.mismatch("tracked map").into()),
        }
    }

    /// Returns the tracked list, or a type error for anything else.
    pub fn into_list(self) -> Result<ListProxy> {
        match self {
            Tracked::List(list) => Ok(list),
            other => Err(other.mismatch("tracked list").into()),
        }
    }

    /// The underlying value. Containers come back as handles to the live
    /// storage, untracked.
    pub fn into_value(self) -> Value {
        match self {
            Tracked::Value(value) => value,
            Tracked::Map(map) => map.to_value(),
            Tracked::List(list) => list.to_value(),
        }
    }

    /// Like [`Tracked::into_value`], by reference.
    pub fn to_value(&self) -> Value {
        self.clone().into_value()
    }

    fn mismatch(&self, expected: &str) -> ContainerError {
        let actual = match self {
            Tracked::Value(value) if value.is_container() => format!("raw {}", value.type_name()),
            Tracked::Value(value) => value.type_name().to_string(),
            Tracked::Map(_) => "tracked map".to_string(),
            Tracked::List(_) => "tracked list".to_string(),
        };
        ContainerError::TypeMismatch {
            expected: expected.to_string(),
            actual,
        }
    }
}

impl PartialEq<Value> for Tracked {
    fn eq(&self, other: &Value) -> bool {
        self.to_value() == *other
    }
}

/// The map contract shared by [`MapProxy`] and plain [`Map`].
pub trait MapOps {
    /// What reading a child returns
    type Item;

    /// Reads the value under `key`.
    fn get(&self, key: &str) -> Result<Self::Item>;

    /// Stores `value` under `key`, creating or replacing it.
    fn set(&self, key: impl Into<String>, value: impl Into<Value>);

    /// Removes `key`, returning its value. Fails if the key is missing.
    fn delete(&self, key: &str) -> Result<Value>;

    fn contains_key(&self, key: &str) -> bool;

    /// Keys in stored order
    fn keys(&self) -> Vec<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sets every pair in order.
    fn update<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in pairs {
            self.set(key, value);
        }
    }
}

/// The list contract shared by [`ListProxy`] and plain [`List`].
///
/// Positions are signed; negative positions count from the end.
pub trait ListOps {
    /// What reading an element returns
    type Item;

    /// Reads the element at `index`.
    fn get(&self, index: i64) -> Result<Self::Item>;

    /// Overwrites the element at `index`.
    fn set(&self, index: i64, value: impl Into<Value>) -> Result<()>;

    /// Removes the element at `index`, returning it.
    fn delete(&self, index: i64) -> Result<Value>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every element, in order
    fn items(&self) -> Vec<Self::Item>;

    fn append(&self, value: impl Into<Value>);

    fn extend<I>(&self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>;

    /// Inserts before `index`, clamped to `[0, len]`.
    fn insert(&self, index: i64, value: impl Into<Value>);

    /// Removes and returns the element at `index`, or the last one.
    fn pop(&self, index: Option<i64>) -> Result<Value>;

    /// Removes the first element equal to `value`, returning it.
    fn remove(&self, value: &Value) -> Result<Value>;

    /// Position of the first element equal to `value`.
    fn index(&self, value: &Value) -> Result<usize>;

    fn contains(&self, value: &Value) -> bool {
        self.index(value).is_ok()
    }

    /// Stable sort with a caller-supplied ordering.
    fn sort_by<F>(&self, compare: F, reverse: bool)
    where
        F: FnMut(&Value, &Value) -> Ordering;

    /// Stable sort by [`Value::compare`].
    fn sort(&self) {
        self.sort_by(Value::compare, false);
    }
}

/// Stable sort that remembers where every element came from.
///
/// Returns `(original_position, value)` pairs in their new order.
pub(crate) fn sorted_with_origin<F>(values: Vec<Value>, mut compare: F, reverse: bool) -> Vec<(usize, Value)>
where
    F: FnMut(&Value, &Value) -> Ordering,
{
    let mut tagged: Vec<(usize, Value)> = values.into_iter().enumerate().collect();
    if reverse {
        tagged.sort_by(|(_, a), (_, b)| compare(b, a));
    } else {
        tagged.sort_by(|(_, a), (_, b)| compare(a, b));
    }
    tagged
}

pub(crate) fn not_found(value: &Value) -> ContainerError {
    ContainerError::ValueNotFound {
        value: value.to_string(),
    }
}

impl MapOps for Map {
    type Item = Value;

    fn get(&self, key: &str) -> Result<Value> {
        Map::get(self, key).ok_or_else(|| {
            ContainerError::KeyNotFound {
                key: key.to_string(),
            }
            .into()
        })
    }

    fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.insert(key, value);
    }

    fn delete(&self, key: &str) -> Result<Value> {
        Map::remove(self, key).ok_or_else(|| {
            ContainerError::KeyNotFound {
                key: key.to_string(),
            }
            .into()
        })
    }

    fn contains_key(&self, key: &str) -> bool {
        Map::contains_key(self, key)
    }

    fn keys(&self) -> Vec<String> {
        Map::keys(self)
    }

    fn len(&self) -> usize {
        Map::len(self)
    }
}

impl ListOps for List {
    type Item = Value;

    fn get(&self, index: i64) -> Result<Value> {
        let position = self.resolve(index)?;
        Ok(List::get(self, position).unwrap_or_default())
    }

    fn set(&self, index: i64, value: impl Into<Value>) -> Result<()> {
        let position = self.resolve(index)?;
        self.replace(position, value)?;
        Ok(())
    }

    fn delete(&self, index: i64) -> Result<Value> {
        let position = self.resolve(index)?;
        Ok(self.remove_at(position)?)
    }

    fn len(&self) -> usize {
        List::len(self)
    }

    fn items(&self) -> Vec<Value> {
        self.to_vec()
    }

    fn append(&self, value: impl Into<Value>) {
        self.push(value);
    }

    fn extend<I>(&self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        List::extend(self, values.into_iter().map(Into::into));
    }

    fn insert(&self, index: i64, value: impl Into<Value>) {
        let position = self.clamp_index(index);
        List::insert(self, position, value);
    }

    fn pop(&self, index: Option<i64>) -> Result<Value> {
        let position = self.pop_index(index)?;
        Ok(self.remove_at(position)?)
    }

    fn remove(&self, value: &Value) -> Result<Value> {
        let position = self.position(value).ok_or_else(|| not_found(value))?;
        Ok(self.remove_at(position)?)
    }

    fn index(&self, value: &Value) -> Result<usize> {
        Ok(self.position(value).ok_or_else(|| not_found(value))?)
    }

    fn sort_by<F>(&self, compare: F, reverse: bool)
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        let sorted = sorted_with_origin(self.to_vec(), compare, reverse);
        self.replace_all(sorted.into_iter().map(|(_, value)| value).collect());
    }
}
