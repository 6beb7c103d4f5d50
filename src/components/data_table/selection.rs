//! Row Selection
//!
//! Selected row ids for the selection bar. Selection is keyed by row id,
//! so it survives page changes.

use std::collections::BTreeSet;

use super::column::RowId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<RowId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row; returns whether it is now selected
    pub fn toggle(&mut self, id: RowId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    pub fn select_all(&mut self, ids: impl IntoIterator<Item = RowId>) {
        self.selected.extend(ids);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Select-all checkbox state against the full row count
    pub fn is_all_selected(&self, total_count: usize) -> bool {
        total_count > 0 && self.selected.len() >= total_count
    }

    /// Selected ids in ascending order
    pub fn ids(&self) -> Vec<RowId> {
        self.selected.iter().cloned().collect()
    }
}
