//! Tracker configuration.

use serde::{Deserialize, Serialize};

/// Options for a [`Tracker`](super::Tracker).
///
/// # Example
///
/// ```
/// use recollect::{Tracker, TrackerConfig};
///
/// let tracker = Tracker::with_config(TrackerConfig {
///     private_keys: vec!["_id".to_string(), "_rev".to_string()],
///     ..Default::default()
/// });
/// assert!(tracker.config().is_private("_rev"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Keys of the root map whose writes are applied but never logged.
    ///
    /// Used for document metadata (identifiers, revisions) that the storage
    /// layer manages itself.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub private_keys: Vec<String>,

    /// Label included in this tracker's log events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl TrackerConfig {
    /// Config for documents that carry `_id`, `_rev` and `_attachments`
    /// metadata at their root.
    pub fn document() -> Self {
        Self {
            private_keys: ["_id", "_rev", "_attachments"]
                .into_iter()
                .map(String::from)
                .collect(),
            ..Default::default()
        }
    }

    /// Returns true if writes to this root key are not logged.
    pub fn is_private(&self, key: &str) -> bool {
        self.private_keys.iter().any(|k| k == key)
    }

    /// The tag to attach to log events
    pub(crate) fn tag(&self) -> &str {
        self.tag.as_deref().unwrap_or("")
    }
}
