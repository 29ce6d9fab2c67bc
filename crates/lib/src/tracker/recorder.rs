//! Recorders: path-bound writers into the action log.
//!
//! Every proxy owns one [`Recorder`]. The proxy reports mutations of its
//! direct children (`create`, `edit`, `remove` keyed by the child key) and
//! the recorder turns them into log entries, coalescing with whatever is
//! still pending at the same path:
//!
//! | pending | `edit` | `remove` |
//! |---|---|---|
//! | none | append `edit` | append `remove` |
//! | `create` | update the create's value | drop the create, append nothing |
//! | `edit` | update the edit's value, keep its `was` | drop the edit, append `remove` with the edit's `was` |
//!
//! Both `edit` and `remove` replace a whole subtree, so they first discard
//! everything logged below the child's path. Entries are matched by where
//! they are now, not by the path they were recorded at: a list shift since
//! then may have moved them to another index.
//!
//! A `remove` that cancels a pending list `create` also renumbers the later
//! entries of that list, which counted the dropped element.

use std::fmt;

use super::{Pending, Tracker};
use crate::{
    action::{Action, ActionKind},
    path::{Key, Path},
    proxy::Tracked,
    value::Value,
};

/// Opaque index of a recorder in its tracker's recorder table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecorderId(usize);

impl RecorderId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecorderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A handle bound to one path of the tracked tree.
///
/// The path lives in the tracker, not in the recorder, so list operations
/// can move it while the handle is held elsewhere.
#[derive(Clone)]
pub struct Recorder {
    tracker: Tracker,
    id: RecorderId,
}

impl Recorder {
    pub(crate) fn new(tracker: Tracker, id: RecorderId) -> Self {
        Self { tracker, id }
    }

    pub fn id(&self) -> RecorderId {
        self.id
    }

    /// The tracker this recorder writes to.
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// The current path of this recorder.
    pub fn path(&self) -> Path {
        self.tracker.state.borrow().path_of(self.id)
    }

    /// The current path of a direct child.
    pub fn child_path(&self, key: impl Into<Key>) -> Path {
        self.path().child(key)
    }

    /// Returns true if the child has a `create` or `edit` still in the log.
    ///
    /// Proxies hand out such children unwrapped: the caller supplied that
    /// value and already holds it.
    pub fn is_pending(&self, key: &Key) -> bool {
        let state = self.tracker.state.borrow();
        let path = state.path_of(self.id).child(key.clone());
        state.pending.contains_key(&path)
    }

    /// Returns true if writes to this child are not logged.
    ///
    /// Only keys of the root map can be private.
    pub fn is_private(&self, key: &Key) -> bool {
        let state = self.tracker.state.borrow();
        match key {
            Key::Field(name) => {
                state.path_of(self.id).is_empty() && state.config.is_private(name)
            }
            Key::Index(_) => false,
        }
    }

    /// Records that `key` now exists with `value`.
    pub fn create(&self, key: Key, value: Value) {
        let became_dirty = {
            let mut state = self.tracker.state.borrow_mut();
            let path = state.path_of(self.id).child(key);
            tracing::trace!(path = %path, "recording create");
            let (entry, became_dirty) = state.push(Action::create(path.clone(), value));
            state.pending.insert(path, Pending::Create(entry));
            became_dirty
        };
        if became_dirty {
            self.tracker.notify_dirty();
        }
    }

    /// Records that `key` changed from `was` to `value`.
    pub fn edit(&self, key: Key, value: Value, was: Value) {
        let became_dirty = {
            let mut state = self.tracker.state.borrow_mut();
            let path = state.path_of(self.id).child(key);
            let discarded = state.discard_descendants(&path);
            if !discarded.is_empty() {
                tracing::debug!(path = %path, discarded = discarded.len(), "edit replaced a modified subtree");
            }

            match state.pending.get(&path).copied() {
                Some(Pending::Create(entry)) | Some(Pending::Edit(entry)) => {
                    tracing::trace!(path = %path, "coalescing edit");
                    if let Some(action) = state.entry_mut(entry) {
                        action.value = Some(value);
                    }
                    false
                }
                None => {
                    tracing::trace!(path = %path, "recording edit");
                    let was = rewind(&was, &discarded, path.len());
                    let (entry, became_dirty) =
                        state.push(Action::edit(path.clone(), value, was));
                    state.pending.insert(path, Pending::Edit(entry));
                    became_dirty
                }
            }
        };
        if became_dirty {
            self.tracker.notify_dirty();
        }
    }

    /// Records that `key`, holding `was`, was deleted.
    pub fn remove(&self, key: Key, was: Value) {
        let became_dirty = {
            let mut state = self.tracker.state.borrow_mut();
            let path = state.path_of(self.id).child(key);
            let discarded = state.discard_descendants(&path);
            if !discarded.is_empty() {
                tracing::debug!(path = %path, discarded = discarded.len(), "remove dropped a modified subtree");
            }

            let was = match state.pending.remove(&path) {
                Some(Pending::Create(entry)) => {
                    tracing::trace!(path = %path, "remove cancels pending create");
                    state.cancel_create(entry);
                    return;
                }
                Some(Pending::Edit(entry)) => state
                    .take(entry)
                    .and_then(|action| action.was)
                    .unwrap_or(was),
                None => rewind(&was, &discarded, path.len()),
            };
            tracing::trace!(path = %path, "recording remove");
            let (_, became_dirty) = state.push(Action::remove(path, was));
            became_dirty
        };
        if became_dirty {
            self.tracker.notify_dirty();
        }
    }

    /// Wraps a child value the same way the tracker wraps a root.
    pub fn track_child(&self, value: Value, key: Key) -> Tracked {
        let path = self.child_path(key);
        self.tracker.track_at(value, path)
    }

    /// Rewrites the key directly below this recorder's path, for every
    /// recorder (and pending entry) below it.
    ///
    /// `adjuster` runs while the tracker is borrowed and must not call back
    /// into it.
    pub fn adjust_child_paths(&self, adjuster: impl Fn(&Key) -> Key) {
        let mut state = self.tracker.state.borrow_mut();
        let base = state.path_of(self.id);
        let adjusted = state.adjust_below(&base, adjuster);
        tracing::trace!(path = %base, adjusted, "adjusted child paths");
    }
}

impl fmt::Debug for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("id", &self.id)
            .field("path", &self.path())
            .finish()
    }
}

/// Reconstructs what a subtree held before the discarded actions below it.
///
/// `was` is the live container, already carrying those mutations; undoing
/// them newest-first on a deep copy yields the value as of the last freeze.
///
/// Only the part of each recorded path below `depth` is used. The part
/// above it can be stale when the subtree has moved inside a list since.
fn rewind(was: &Value, discarded: &[Action], depth: usize) -> Value {
    if discarded.is_empty() || was.is_scalar() {
        return was.clone();
    }
    let restored = was.deep_clone();
    for action in discarded.iter().rev() {
        let Some(relative) = action.path.keys().get(depth..) else {
            continue;
        };
        if !undo(&restored, relative, action) {
            tracing::trace!(path = %action.path, "could not rewind discarded action");
        }
    }
    restored
}

fn undo(root: &Value, relative: &[Key], action: &Action) -> bool {
    let Some((last, parents)) = relative.split_last() else {
        return false;
    };

    let mut current = root.clone();
    for key in parents {
        let next = match (&current, key) {
            (Value::Map(map), Key::Field(name)) => map.get(name),
            (Value::List(list), Key::Index(index)) => {
                usize::try_from(*index).ok().and_then(|i| list.get(i))
            }
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return false,
        }
    }

    let was = || action.was.as_ref().map(Value::deep_clone).unwrap_or_default();
    match (&current, last) {
        (Value::Map(map), Key::Field(name)) => match action.kind {
            ActionKind::Create => map.remove(name).is_some(),
            ActionKind::Edit | ActionKind::Remove => {
                map.insert(name.clone(), was());
                true
            }
        },
        (Value::List(list), Key::Index(index)) => {
            let Ok(index) = usize::try_from(*index) else {
                return false;
            };
            match action.kind {
                ActionKind::Create => list.remove_at(index).is_ok(),
                ActionKind::Edit => list.replace(index, was()).is_ok(),
                ActionKind::Remove if index <= list.len() => {
                    list.insert(index, was());
                    true
                }
                ActionKind::Remove => false,
            }
        }
        _ => false,
    }
}
