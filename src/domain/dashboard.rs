//! Dashboard - Dashboard list entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dashboard as returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: i64,
    pub title: String,
    /// Owner display name; missing owners come through as `None`
    #[serde(default)]
    pub owner: Option<String>,
    pub last_modified: DateTime<Utc>,
    /// Favorited by the current user
    #[serde(default)]
    pub is_favorite: bool,
    /// Shown pinned above the list
    #[serde(default)]
    pub is_landing_page: bool,
    #[serde(default)]
    pub chart_count: u32,
}

impl Dashboard {
    /// Owner name with the `unknown` sentinel for missing owners
    pub fn owner_name(&self) -> &str {
        self.owner
            .as_deref()
            .filter(|owner| !owner.is_empty())
            .unwrap_or(crate::constants::UNKNOWN_SENTINEL)
    }
}
