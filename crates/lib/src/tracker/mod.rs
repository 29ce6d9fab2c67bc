//! The tracker: owner of the action log and of every recorder's path.
//!
//! A [`Tracker`] is created once per tree. [`Tracker::track`] wraps the root
//! container in a proxy; everything reached through that proxy shares the
//! tracker's state:
//!
//! - the **action log**, in the order mutations happened;
//! - the **recorder table**, an arena mapping [`RecorderId`]s to paths. Proxies
//!   only hold ids, so list operations can move every outstanding handle by
//!   rewriting this table;
//! - the **pending table**, which remembers the live `create`/`edit` entry
//!   per path so repeated mutations coalesce instead of piling up.
//!
//! # Example
//!
//! ```
//! use recollect::{Action, MapOps, Tracker, path};
//! use serde_json::json;
//!
//! let tracker = Tracker::new();
//! let doc = tracker.track(json!({"title": "draft"})).into_map()?;
//!
//! doc.set("title", "final");
//! doc.set("title", "published");
//!
//! assert_eq!(
//!     tracker.freeze(),
//!     vec![Action::edit(path!["title"], "published", "draft")]
//! );
//! assert!(tracker.is_empty());
//! # Ok::<(), recollect::Error>(())
//! ```
//!
//! The tree is single-threaded: trackers, proxies and values are `!Send`.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{
    Result,
    action::{Action, ActionKind},
    path::{Key, Path},
    proxy::{ListProxy, MapProxy, Tracked},
    value::Value,
};

mod config;
mod recorder;

pub use config::TrackerConfig;
pub use recorder::{Recorder, RecorderId};

/// Callback run when the log goes from empty to non-empty.
pub type DirtyCallback = Box<dyn FnMut()>;

/// Stable identity of one log entry, independent of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EntryId(u64);

/// The live entry a path's next mutation coalesces into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Create(EntryId),
    Edit(EntryId),
}

/// A log entry. `action.path` is where the mutation happened; `location` is
/// where that spot is now, after later list shifts.
#[derive(Debug)]
struct LogEntry {
    id: EntryId,
    location: Path,
    action: Action,
}

#[derive(Debug, Default)]
struct TrackerState {
    config: TrackerConfig,
    log: Vec<LogEntry>,
    next_entry: u64,
    /// Recorder arena, indexed by `RecorderId`
    paths: Vec<Path>,
    pending: HashMap<Path, Pending>,
}

impl TrackerState {
    /// Appends an action. The flag is true when the log was empty before.
    fn push(&mut self, action: Action) -> (EntryId, bool) {
        let became_dirty = self.log.is_empty();
        let id = EntryId(self.next_entry);
        self.next_entry += 1;
        let location = action.path.clone();
        self.log.push(LogEntry {
            id,
            location,
            action,
        });
        (id, became_dirty)
    }

    fn entry_mut(&mut self, id: EntryId) -> Option<&mut Action> {
        self.log
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| &mut entry.action)
    }

    /// Removes an entry from the log, returning its action.
    fn take(&mut self, id: EntryId) -> Option<Action> {
        let index = self.log.iter().position(|entry| entry.id == id)?;
        Some(self.log.remove(index).action)
    }

    /// Drops a pending `create` that is being undone before the next freeze.
    ///
    /// When the created value was a list element, entries recorded after it
    /// counted it in their indices. Those are renumbered so the remaining log
    /// still replays in order.
    fn cancel_create(&mut self, id: EntryId) {
        let Some(index) = self.log.iter().position(|entry| entry.id == id) else {
            return;
        };
        let cancelled = self.log.remove(index).action.path;
        let (Some(Key::Index(mut position)), Some(list)) =
            (cancelled.last().cloned(), cancelled.parent())
        else {
            return;
        };
        let depth = list.len();

        for entry in self.log[index..].iter_mut() {
            let path = &mut entry.action.path;
            if !path.is_descendant_of(&list) {
                continue;
            }
            let Some(Key::Index(at)) = path.keys().get(depth).cloned() else {
                continue;
            };
            let direct = path.len() == depth + 1;
            match entry.action.kind {
                // Inserted at or before the cancelled element, pushing it right
                ActionKind::Create if direct && at <= position => position += 1,
                ActionKind::Remove if direct && at < position => position -= 1,
                _ if at > position => path.replace_key(depth, Key::Index(at - 1)),
                _ => {}
            }
        }
    }

    fn path_of(&self, id: RecorderId) -> Path {
        self.paths.get(id.index()).cloned().unwrap_or_default()
    }

    /// Drops every entry whose current location is strictly below `path`,
    /// along with the pending bookkeeping that pointed at them. Returns the
    /// dropped actions in log order.
    fn discard_descendants(&mut self, path: &Path) -> Vec<Action> {
        let (discarded, kept): (Vec<LogEntry>, Vec<LogEntry>) = std::mem::take(&mut self.log)
            .into_iter()
            .partition(|entry| entry.location.is_descendant_of(path));
        self.log = kept;
        self.pending.retain(|pending, _| !pending.is_descendant_of(path));
        discarded.into_iter().map(|entry| entry.action).collect()
    }

    /// Rewrites the key directly below `base` for every recorder, pending
    /// path and log location under it. Recorded action paths keep the
    /// position they had when the mutation happened.
    fn adjust_below(&mut self, base: &Path, adjuster: impl Fn(&Key) -> Key) -> usize {
        let depth = base.len();
        let shift = |path: &mut Path| {
            if path.is_descendant_of(base) {
                let key = adjuster(&path.keys()[depth]);
                path.replace_key(depth, key);
                true
            } else {
                false
            }
        };

        let mut adjusted = 0;
        for path in self.paths.iter_mut() {
            if shift(path) {
                adjusted += 1;
            }
        }
        for entry in self.log.iter_mut() {
            shift(&mut entry.location);
        }
        self.pending = std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(mut path, pending)| {
                shift(&mut path);
                (path, pending)
            })
            .collect();
        adjusted
    }
}

/// Records every mutation made through the proxies it hands out.
///
/// `Tracker` is a cheap handle; clones share the same log.
///
/// Every child handed out by `get`, `items` or `iter` gets its own recorder,
/// and recorders are never released. Each list insert or delete walks all of
/// them, so a long-lived tracker over a large list that is read repeatedly
/// gets slower to shift. Start a new tracker per batch when that matters.
#[derive(Clone, Default)]
pub struct Tracker {
    state: Rc<RefCell<TrackerState>>,
    on_dirty: Rc<RefCell<Option<DirtyCallback>>>,
}

impl Tracker {
    /// Creates a tracker with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker with the given configuration.
    pub fn with_config(config: TrackerConfig) -> Self {
        let tracker = Self::default();
        tracker.state.borrow_mut().config = config;
        tracker
    }

    /// Installs the callback run each time the log goes from empty to
    /// non-empty.
    ///
    /// The callback may read the tracker; it runs with no internal borrow held.
    pub fn with_dirty_callback(self, callback: impl FnMut() + 'static) -> Self {
        *self.on_dirty.borrow_mut() = Some(Box::new(callback));
        self
    }

    /// Returns a copy of the configuration.
    pub fn config(&self) -> TrackerConfig {
        self.state.borrow().config.clone()
    }

    /// Starts tracking a value.
    ///
    /// Maps and lists come back wrapped in a proxy rooted at the empty path;
    /// scalars come back unchanged in [`Tracked::Value`].
    pub fn track(&self, value: impl Into<Value>) -> Tracked {
        self.track_at(value.into(), Path::new())
    }

    /// Wraps `value` according to its shape, with a new recorder at `path`.
    pub(crate) fn track_at(&self, value: Value, path: Path) -> Tracked {
        tracing::trace!(path = %path, shape = ?value.shape(), "tracking value");
        match value {
            Value::Map(map) => Tracked::Map(MapProxy::new(map, self.make_recorder(path))),
            Value::List(list) => Tracked::List(ListProxy::new(list, self.make_recorder(path))),
            scalar => Tracked::Value(scalar),
        }
    }

    /// Allocates a recorder bound to `path`.
    pub fn make_recorder(&self, path: Path) -> Recorder {
        let mut state = self.state.borrow_mut();
        let id = RecorderId::new(state.paths.len());
        state.paths.push(path);
        Recorder::new(self.clone(), id)
    }

    /// Appends an action to the log as-is, with no coalescing.
    pub fn append(&self, action: Action) {
        let (_, became_dirty) = self.state.borrow_mut().push(action);
        if became_dirty {
            self.notify_dirty();
        }
    }

    /// Returns the log in recorded order without consuming it.
    pub fn actions(&self) -> Vec<Action> {
        self.state
            .borrow()
            .log
            .iter()
            .map(|entry| entry.action.clone())
            .collect()
    }

    /// Iterates over a snapshot of the log.
    pub fn iter(&self) -> std::vec::IntoIter<Action> {
        self.actions().into_iter()
    }

    /// Number of entries in the log
    pub fn len(&self) -> usize {
        self.state.borrow().log.len()
    }

    /// Returns true if nothing has been recorded since the last clear
    pub fn is_empty(&self) -> bool {
        self.state.borrow().log.is_empty()
    }

    /// Alias of `!is_empty()`, for callers deciding whether to persist.
    pub fn is_dirty(&self) -> bool {
        !self.is_empty()
    }

    /// Forgets all recorded changes.
    ///
    /// Recorder paths survive, so proxies obtained earlier keep recording at
    /// the right place.
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        tracing::debug!(tag = state.config.tag(), dropped = state.log.len(), "clearing action log");
        state.log.clear();
        state.pending.clear();
    }

    /// Returns everything recorded so far and clears the log.
    pub fn freeze(&self) -> Vec<Action> {
        let mut state = self.state.borrow_mut();
        let actions: Vec<Action> = std::mem::take(&mut state.log)
            .into_iter()
            .map(|entry| entry.action)
            .collect();
        state.pending.clear();
        tracing::debug!(tag = state.config.tag(), actions = actions.len(), "froze action log");
        actions
    }

    /// Number of recorders allocated so far.
    pub fn recorder_count(&self) -> usize {
        self.state.borrow().paths.len()
    }

    /// Current path of a recorder.
    pub fn recorder_path(&self, id: RecorderId) -> Option<Path> {
        self.state.borrow().paths.get(id.index()).cloned()
    }

    /// Serializes the current log as a JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.actions())?)
    }

    fn notify_dirty(&self) {
        tracing::debug!(tag = self.state.borrow().config.tag(), "tracker became dirty");
        // Taken out for the call so the callback can touch the tracker.
        let callback = self.on_dirty.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback();
            let mut slot = self.on_dirty.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Tracker")
            .field("config", &state.config)
            .field("actions", &state.log.len())
            .field("recorders", &state.paths.len())
            .finish()
    }
}

impl IntoIterator for &Tracker {
    type Item = Action;
    type IntoIter = std::vec::IntoIter<Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
