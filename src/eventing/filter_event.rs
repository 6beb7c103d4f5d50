//! FilterEvent - Filter Panel Notifications
//!
//! Everything the filter panel tells its owner. Pending edits never
//! produce an event; only Apply, Clear, deletion, reordering and failures do.

use crate::domain::filter_value::AppliedFilters;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterEvent {
    /// A complete snapshot to drive chart refreshes
    Applied(AppliedFilters),

    /// All pending values were cleared (no apply implied)
    Cleared,

    /// A filter was removed from the dashboard
    Deleted { id: String },

    /// Display order changed
    Reordered { ids: Vec<String> },

    /// An external call failed; shown through the owner's notifications
    Error {
        filter_id: Option<String>,
        message: String,
    },
}

impl FilterEvent {
    pub fn error(filter_id: Option<&str>, message: impl Into<String>) -> Self {
        Self::Error {
            filter_id: filter_id.map(str::to_string),
            message: message.into(),
        }
    }
}
