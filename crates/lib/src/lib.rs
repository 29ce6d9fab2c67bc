//!
//! Recollect: change tracking for in-memory document trees.
//! This library records every structural mutation of a tree of nested maps and
//! lists as a path-addressed log, while the tree keeps behaving like a plain one.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: The tree itself. Maps and lists are shared
//!   handles, so the caller and the tracker see the same data; scalars are plain values.
//! * **Paths (`path::Path`)**: The keys and indices leading from the root to a value.
//! * **Actions (`action::Action`)**: One `create`, `edit` or `remove` at a path, with the
//!   new value and the value it replaced.
//! * **Tracker (`tracker::Tracker`)**: Owns the action log for one tree and the current path
//!   of every handle into it.
//! * **Proxies (`proxy::MapProxy`, `proxy::ListProxy`)**: Tracked views of a container. Reads
//!   pass through; writes are applied and reported, coalescing repeated writes to the same
//!   location and keeping held handles valid when list elements move.
//!
//! ```
//! use recollect::{ActionKind, ListOps, MapOps, Tracker};
//! use serde_json::json;
//!
//! let tracker = Tracker::new();
//! let doc = tracker.track(json!({"tags": ["a"], "count": 1})).into_map()?;
//!
//! doc.set("count", 2);
//! doc.get("tags")?.into_list()?.append("b");
//!
//! let kinds: Vec<ActionKind> = tracker.freeze().iter().map(|a| a.kind).collect();
//! assert_eq!(kinds, vec![ActionKind::Edit, ActionKind::Create]);
//! # Ok::<(), recollect::Error>(())
//! ```

pub mod action;
pub mod path;
pub mod proxy;
pub mod tracker;
pub mod value;

pub use action::{Action, ActionKind};
pub use path::{Key, Path};
pub use proxy::{ListOps, ListProxy, MapOps, MapProxy, Tracked};
pub use tracker::{Recorder, RecorderId, Tracker, TrackerConfig};
pub use value::{ContainerError, List, Map, Shape, Value};

/// Result type used throughout the Recollect library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Recollect library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured container errors from the value module
    #[error(transparent)]
    Container(value::ContainerError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Container(_) => "value",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a key or value was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Container(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is a list bounds failure.
    pub fn is_index_error(&self) -> bool {
        match self {
            Error::Container(err) => err.is_index_error(),
            _ => false,
        }
    }

    /// Check if this error is a shape mismatch.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Container(err) => err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error came from (de)serialization.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}
