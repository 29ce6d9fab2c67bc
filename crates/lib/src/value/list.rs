//! Shared, ordered list container.
//!
//! Besides storage, this module owns the index conventions every list
//! operation uses: negative positions count from the end, lookups must land
//! inside the list, and insertion points are clamped to `[0, len]`.

use std::{cell::RefCell, cmp::Ordering, fmt, rc::Rc};

use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeSeq};

use super::{ContainerError, Value};

/// An ordered list of [`Value`]s.
///
/// Like [`Map`](super::Map), `List` is a handle; clones alias the same
/// storage and [`List::deep_clone`] makes an independent copy.
#[derive(Clone, Default)]
pub struct List {
    items: Rc<RefCell<Vec<Value>>>,
}

impl List {
    /// Creates a new empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Returns true if the list has no elements
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Returns the element at `index`
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    /// Appends an element
    pub fn push(&self, value: impl Into<Value>) {
        self.items.borrow_mut().push(value.into());
    }

    /// Appends every element of `values`
    pub fn extend(&self, values: impl IntoIterator<Item = Value>) {
        self.items.borrow_mut().extend(values);
    }

    /// Inserts at `index`, clamped to the end of the list.
    pub fn insert(&self, index: usize, value: impl Into<Value>) {
        let mut items = self.items.borrow_mut();
        let index = index.min(items.len());
        items.insert(index, value.into());
    }

    /// Overwrites the element at `index`, returning the previous one.
    pub fn replace(&self, index: usize, value: impl Into<Value>) -> Result<Value, ContainerError> {
        let mut items = self.items.borrow_mut();
        let len = items.len();
        let slot = items
            .get_mut(index)
            .ok_or(ContainerError::IndexOutOfRange {
                index: index as i64,
                len,
            })?;
        Ok(std::mem::replace(slot, value.into()))
    }

    /// Removes and returns the element at `index`.
    pub fn remove_at(&self, index: usize) -> Result<Value, ContainerError> {
        let mut items = self.items.borrow_mut();
        if index >= items.len() {
            return Err(ContainerError::IndexOutOfRange {
                index: index as i64,
                len: items.len(),
            });
        }
        Ok(items.remove(index))
    }

    /// Returns the position of the first element equal to `value`
    pub fn position(&self, value: &Value) -> Option<usize> {
        self.items.borrow().iter().position(|item| item == value)
    }

    /// Returns a snapshot of the elements
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    /// Replaces the whole content of the list
    pub fn replace_all(&self, values: Vec<Value>) {
        *self.items.borrow_mut() = values;
    }

    /// Resolves a possibly negative position to an existing element.
    ///
    /// ```
    /// # use recollect::value::List;
    /// let list: List = [10, 20, 30].into_iter().collect();
    /// assert_eq!(list.resolve(-1), Ok(2));
    /// assert!(list.resolve(3).is_err());
    /// assert!(list.resolve(-4).is_err());
    /// ```
    pub fn resolve(&self, index: i64) -> Result<usize, ContainerError> {
        let len = self.len();
        let absolute = if index < 0 { len as i64 + index } else { index };
        if absolute < 0 || absolute >= len as i64 {
            return Err(ContainerError::IndexOutOfRange { index, len });
        }
        Ok(absolute as usize)
    }

    /// Resolves an insertion point: negative counts from the end and the
    /// result is clamped to `[0, len]`.
    pub fn clamp_index(&self, index: i64) -> usize {
        let len = self.len() as i64;
        let absolute = if index < 0 { len + index } else { index };
        absolute.clamp(0, len) as usize
    }

    /// Resolves the position a `pop` removes. `None` means the last element.
    ///
    /// Positions are clamped like insertion points, so anything at or past
    /// the end is an error.
    pub fn pop_index(&self, index: Option<i64>) -> Result<usize, ContainerError> {
        let len = self.len();
        if len == 0 {
            return Err(ContainerError::EmptyList);
        }
        let requested = index.unwrap_or(-1);
        let position = self.clamp_index(requested);
        if position >= len {
            return Err(ContainerError::IndexOutOfRange {
                index: requested,
                len,
            });
        }
        Ok(position)
    }

    /// Returns true if both handles point at the same storage
    pub fn ptr_eq(&self, other: &List) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }

    /// Recursively copies this list and every container below it.
    pub fn deep_clone(&self) -> List {
        self.items.borrow().iter().map(Value::deep_clone).collect()
    }

    /// Total ordering over lists: lexicographic by element.
    pub fn compare(&self, other: &List) -> Ordering {
        if self.ptr_eq(other) {
            return Ordering::Equal;
        }
        let left = self.items.borrow();
        let right = other.items.borrow();
        left.iter()
            .zip(right.iter())
            .map(|(l, r)| l.compare(r))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| left.len().cmp(&right.len()))
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.items.borrow() == *other.items.borrow()
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.borrow().iter()).finish()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.items.borrow().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

impl<V: Into<Value>> FromIterator<V> for List {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: Rc::new(RefCell::new(iter.into_iter().map(Into::into).collect())),
        }
    }
}

impl Serialize for List {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let items = self.items.borrow();
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for value in items.iter() {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for List {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<Value>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}
