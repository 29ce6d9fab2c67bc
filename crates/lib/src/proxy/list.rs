//! Tracked view of a [`List`].
//!
//! Besides recording mutations, the list proxy keeps every outstanding
//! handle below it pointing at the right element. Inserting or removing an
//! element moves its later siblings, so the recorder paths of those
//! siblings (and of everything below them) are shifted to match:
//!
//! | operation | recorded | shifted |
//! |---|---|---|
//! | `delete(i)` | `remove [i]` | indices `>= i` by -1 |
//! | `insert(i, v)` | `create [i]`, after the shift | indices `>= i` by +1 |
//! | `pop(i)`, `remove(v)` | `remove [i]` | indices `>= i + 1` by -1 |
//! | `sort` | `edit` per moved position | nothing |

use std::{cmp::Ordering, fmt};

use super::{ListOps, Tracked, not_found, sorted_with_origin};
use crate::{
    Result,
    path::{Key, Path},
    tracker::Recorder,
    value::{List, Value},
};

/// A [`List`] whose mutations are recorded.
#[derive(Clone)]
pub struct ListProxy {
    list: List,
    recorder: Recorder,
}

impl ListProxy {
    pub(crate) fn new(list: List, recorder: Recorder) -> Self {
        Self { list, recorder }
    }

    /// The current path of this list in the tree.
    pub fn path(&self) -> Path {
        self.recorder.path()
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// The underlying list. Writes through it are not recorded.
    pub fn as_list(&self) -> &List {
        &self.list
    }

    /// The underlying list as a value handle.
    pub fn to_value(&self) -> Value {
        Value::List(self.list.clone())
    }

    /// Iterates over a snapshot of the elements, wrapped as by
    /// [`ListOps::get`].
    pub fn iter(&self) -> std::vec::IntoIter<Tracked> {
        self.items().into_iter()
    }

    fn child(&self, position: usize, value: Value) -> Tracked {
        let key = index_key(position);
        if self.recorder.is_pending(&key) {
            return Tracked::Value(value);
        }
        self.recorder.track_child(value, key)
    }

    /// Moves every handle at or after `start` by `delta`.
    fn shift_from(&self, start: usize, delta: i64) {
        let start = start as i64;
        self.recorder.adjust_child_paths(move |key| match key {
            Key::Index(index) if *index >= start => Key::Index(index + delta),
            other => other.clone(),
        });
    }
}

fn index_key(position: usize) -> Key {
    Key::Index(position as i64)
}

impl ListOps for ListProxy {
    type Item = Tracked;

    fn get(&self, index: i64) -> Result<Tracked> {
        let position = self.list.resolve(index)?;
        let value = self.list.get(position).unwrap_or_default();
        Ok(self.child(position, value))
    }

    fn set(&self, index: i64, value: impl Into<Value>) -> Result<()> {
        let position = self.list.resolve(index)?;
        let value = value.into();
        let was = self.list.replace(position, value.clone())?;
        if !was.is_equivalent(&value) {
            self.recorder.edit(index_key(position), value, was);
        }
        Ok(())
    }

    fn delete(&self, index: i64) -> Result<Value> {
        let position = self.list.resolve(index)?;
        let was = self.list.remove_at(position)?;
        self.recorder.remove(index_key(position), was.clone());
        self.shift_from(position, -1);
        Ok(was)
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn items(&self) -> Vec<Tracked> {
        self.list
            .to_vec()
            .into_iter()
            .enumerate()
            .map(|(position, value)| self.child(position, value))
            .collect()
    }

    fn append(&self, value: impl Into<Value>) {
        let value = value.into();
        self.recorder.create(index_key(self.list.len()), value.clone());
        self.list.push(value);
    }

    fn extend<I>(&self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        for value in values {
            self.append(value);
        }
    }

    fn insert(&self, index: i64, value: impl Into<Value>) {
        let position = self.list.clamp_index(index);
        let value = value.into();
        self.shift_from(position, 1);
        self.recorder.create(index_key(position), value.clone());
        self.list.insert(position, value);
    }

    fn pop(&self, index: Option<i64>) -> Result<Value> {
        let position = self.list.pop_index(index)?;
        let was = self.list.remove_at(position)?;
        self.recorder.remove(index_key(position), was.clone());
        self.shift_from(position + 1, -1);
        Ok(was)
    }

    fn remove(&self, value: &Value) -> Result<Value> {
        let position = self.list.position(value).ok_or_else(|| not_found(value))?;
        let was = self.list.remove_at(position)?;
        self.recorder.remove(index_key(position), was.clone());
        self.shift_from(position + 1, -1);
        Ok(was)
    }

    fn index(&self, value: &Value) -> Result<usize> {
        Ok(self.list.position(value).ok_or_else(|| not_found(value))?)
    }

    fn sort_by<F>(&self, compare: F, reverse: bool)
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        let before = self.list.to_vec();
        let sorted = sorted_with_origin(before.clone(), compare, reverse);
        self.list
            .replace_all(sorted.iter().map(|(_, value)| value.clone()).collect());

        // Moved elements are told apart by origin, so equal values that
        // swapped places still count as moved.
        for (position, (origin, value)) in sorted.into_iter().enumerate() {
            if origin != position {
                self.recorder
                    .edit(index_key(position), value, before[position].clone());
            }
        }
    }
}

impl IntoIterator for &ListProxy {
    type Item = Tracked;
    type IntoIter = std::vec::IntoIter<Tracked>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for ListProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListProxy")
            .field("path", &self.path())
            .field("list", &self.list)
            .finish()
    }
}
