//! Entries of the action log.
//!
//! Each [`Action`] describes one net change at a [`Path`]: a key or index that
//! appeared (`create`), changed (`edit`), or disappeared (`remove`). Actions
//! serialize to the shape collaborators replay into storage:
//!
//! ```
//! use recollect::{Action, path};
//!
//! let action = Action::edit(path!["title"], "new", "old");
//! assert_eq!(
//!     serde_json::to_string(&action).unwrap(),
//!     r#"{"action":"edit","path":["title"],"value":"new","was":"old"}"#
//! );
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{path::Path, value::Value};

/// The kind of change an [`Action`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// A key or index that did not exist now does
    Create,
    /// An existing key or index holds a different value
    Edit,
    /// An existing key or index was deleted
    Remove,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Create => "create",
            ActionKind::Edit => "edit",
            ActionKind::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// One committed mutation.
///
/// `value` is present for `create` and `edit`; `was` is present for `edit`
/// and `remove`. Container values are handles into the tracked tree, so a
/// container created and then mutated without being re-read shows its latest
/// content here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "action")]
    pub kind: ActionKind,
    pub path: Path,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub was: Option<Value>,
}

impl Action {
    /// A `create` action at `path`.
    pub fn create(path: Path, value: impl Into<Value>) -> Self {
        Self {
            kind: ActionKind::Create,
            path,
            value: Some(value.into()),
            was: None,
        }
    }

    /// An `edit` action at `path`.
    pub fn edit(path: Path, value: impl Into<Value>, was: impl Into<Value>) -> Self {
        Self {
            kind: ActionKind::Edit,
            path,
            value: Some(value.into()),
            was: Some(was.into()),
        }
    }

    /// A `remove` action at `path`.
    pub fn remove(path: Path, was: impl Into<Value>) -> Self {
        Self {
            kind: ActionKind::Remove,
            path,
            value: None,
            was: Some(was.into()),
        }
    }

    pub fn is_create(&self) -> bool {
        self.kind == ActionKind::Create
    }

    pub fn is_edit(&self) -> bool {
        self.kind == ActionKind::Edit
    }

    pub fn is_remove(&self) -> bool {
        self.kind == ActionKind::Remove
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.kind, self.path)?;
        if let Some(value) = &self.value {
            write!(f, " = {value}")?;
        }
        if let Some(was) = &self.was {
            write!(f, " (was {was})")?;
        }
        Ok(())
    }
}
