//! FilterPanel - Dashboard Filter Reconciliation
//!
//! Holds the pending values of a dashboard's filters. The external filter
//! list is merged in with [`FilterPanel::sync_filters`]; edits stay local
//! until an explicit Apply hands a complete snapshot to the owner.
//!
//! Invariants:
//! - a pending edit is only dropped when its filter disappears or turns
//!   invalid
//! - a tombstoned id never comes back from a stale external list
//! - at most one Apply and one delete are in flight

use std::future::Future;

use ahash::{AHashMap, AHashSet};
use crossbeam_channel::Sender;

use crate::domain::dashboard_filter::DashboardFilterConfig;
use crate::domain::filter_value::{AppliedFilters, FilterValue};
use crate::error::{Error, Result};
use crate::eventing::filter_event::FilterEvent;
use crate::services::FilterApi;

pub struct FilterPanel {
    /// Filters in display order
    filters: Vec<DashboardFilterConfig>,
    /// Pending (unapplied) values
    current_values: AHashMap<String, FilterValue>,
    /// Filters failing validation, with the reason
    invalid: AHashMap<String, String>,
    /// Ids deleted locally; suppresses stale external lists
    locally_deleted_ids: AHashSet<String>,
    is_applying: bool,
    deleting: Option<String>,
    events: Sender<FilterEvent>,
}

impl FilterPanel {
    pub fn new(events: Sender<FilterEvent>) -> Self {
        Self {
            filters: Vec::new(),
            current_values: AHashMap::new(),
            invalid: AHashMap::new(),
            locally_deleted_ids: AHashSet::new(),
            is_applying: false,
            deleting: None,
            events,
        }
    }

    fn notify(&self, event: FilterEvent) {
        if let Err(e) = self.events.send(event) {
            tracing::warn!("Filter event dropped, receiver gone: {:?}", e.into_inner());
        }
    }

    // ==================== Reconciliation ====================

    /// Merge a new external filter list into local state
    ///
    /// Tombstoned ids are dropped, values of vanished filters are pruned,
    /// and filters without a pending value get their default. Running it
    /// twice with the same list changes nothing.
    pub fn sync_filters(&mut self, initial_filters: Vec<DashboardFilterConfig>) {
        let incoming = initial_filters.len();
        let mut seen = AHashSet::new();
        let mut filters = Vec::with_capacity(incoming);
        for filter in initial_filters {
            if self.locally_deleted_ids.contains(&filter.id) {
                tracing::debug!(filter_id = %filter.id, "Skipping locally deleted filter");
                continue;
            }
            if !seen.insert(filter.id.clone()) {
                tracing::warn!(filter_id = %filter.id, "Duplicate filter id in external list");
                continue;
            }
            filters.push(filter);
        }

        self.invalid.clear();
        for filter in &filters {
            if let Err(e) = filter.validate() {
                tracing::warn!("{}", e);
                self.invalid.insert(filter.id.clone(), e.to_string());
            }
        }

        // Invalid filters never carry a value, even one edited while valid
        let before = self.current_values.len();
        let invalid = &self.invalid;
        self.current_values
            .retain(|id, _| seen.contains(id) && !invalid.contains_key(id));
        let pruned = before - self.current_values.len();

        let mut seeded = 0;
        for filter in &filters {
            if self.invalid.contains_key(&filter.id) || self.current_values.contains_key(&filter.id)
            {
                continue;
            }
            if let Some(default) = filter.default_value() {
                self.current_values.insert(filter.id.clone(), default);
                seeded += 1;
            }
        }

        self.filters = filters;
        tracing::debug!(
            incoming,
            kept = self.filters.len(),
            invalid = self.invalid.len(),
            pruned,
            seeded,
            "Reconciled dashboard filters"
        );
    }

    /// Reconcile from raw API JSON; an unreadable list degrades to no filters
    pub fn sync_filters_json(&mut self, raw: &serde_json::Value) {
        let Some(items) = raw.as_array() else {
            tracing::error!("Filter list is not an array; clearing filters");
            self.sync_filters(Vec::new());
            return;
        };

        let filters = items
            .iter()
            .filter_map(|item| {
                serde_json::from_value::<DashboardFilterConfig>(item.clone())
                    .map_err(|e| tracing::warn!("Skipping unreadable filter: {}", e))
                    .ok()
            })
            .collect();
        self.sync_filters(filters);
    }

    // ==================== Editing ====================

    /// Record a pending edit; `None` removes the value
    ///
    /// Never notifies the owner. Returns false for unknown or invalid
    /// filters.
    pub fn on_change(&mut self, id: &str, value: Option<FilterValue>) -> bool {
        if !self.filters.iter().any(|f| f.id == id) || self.invalid.contains_key(id) {
            tracing::debug!(filter_id = id, "Ignoring change for unknown or invalid filter");
            return false;
        }
        match value {
            Some(value) => {
                self.current_values.insert(id.to_string(), value);
            }
            None => {
                self.current_values.remove(id);
            }
        }
        true
    }

    /// Drop every pending value and tell the owner; does not apply
    pub fn clear_all(&mut self) {
        self.current_values.clear();
        tracing::info!("Cleared all dashboard filter values");
        self.notify(FilterEvent::Cleared);
    }

    // ==================== Apply ====================

    /// Snapshot covering every configured filter, `None` where unset
    pub fn snapshot(&self) -> AppliedFilters {
        let mut snapshot = AppliedFilters::new();
        for filter in &self.filters {
            snapshot.push(filter.id.clone(), self.current_values.get(&filter.id).cloned());
        }
        snapshot
    }

    /// Start an Apply: emits the snapshot once and raises the in-flight
    /// guard. Returns `None` while another Apply is running.
    pub fn begin_apply(&mut self) -> Option<AppliedFilters> {
        if self.is_applying {
            tracing::warn!("Apply already in progress; ignoring");
            return None;
        }
        self.is_applying = true;
        let snapshot = self.snapshot();
        tracing::info!(filters = snapshot.len(), "Applying dashboard filters");
        self.notify(FilterEvent::Applied(snapshot.clone()));
        Some(snapshot)
    }

    /// Lower the in-flight guard once the owner has refreshed
    pub fn finish_apply(&mut self) {
        self.is_applying = false;
    }

    /// Apply and wait for the owner's refresh
    pub async fn apply<F, Fut>(&mut self, refresh: F) -> Option<AppliedFilters>
    where
        F: FnOnce(AppliedFilters) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let snapshot = self.begin_apply()?;
        let result = refresh(snapshot.clone()).await;
        self.finish_apply();
        if let Err(e) = result {
            tracing::error!("Dashboard refresh failed: {}", e);
            self.notify(FilterEvent::error(None, e.to_string()));
        }
        Some(snapshot)
    }

    /// Whether pending values differ from what was last applied
    pub fn has_pending_changes(&self, last_applied: &AppliedFilters) -> bool {
        self.snapshot() != *last_applied
    }

    // ==================== Delete ====================

    /// Start deleting `id`; false if another delete is running or the id
    /// is unknown
    pub fn begin_delete(&mut self, id: &str) -> bool {
        if let Some(pending) = &self.deleting {
            tracing::warn!(filter_id = id, pending = %pending, "Delete already in progress");
            return false;
        }
        if !self.filters.iter().any(|f| f.id == id) {
            tracing::warn!(filter_id = id, "Delete requested for unknown filter");
            return false;
        }
        self.deleting = Some(id.to_string());
        true
    }

    /// Finish a delete with the API's result
    ///
    /// Local state only changes on success; a failure leaves the filter
    /// visible and editable.
    ///
    /// Ignored unless `id` is the delete in flight. Returns whether it was.
    pub fn finish_delete(&mut self, id: &str, result: &Result<()>) -> bool {
        if self.deleting.as_deref() != Some(id) {
            tracing::warn!(filter_id = id, "No delete in flight for this filter");
            return false;
        }
        self.deleting = None;
        match result {
            Ok(()) => {
                self.locally_deleted_ids.insert(id.to_string());
                self.filters.retain(|f| f.id != id);
                self.current_values.remove(id);
                self.invalid.remove(id);
                tracing::info!(filter_id = id, "Dashboard filter deleted");
                self.notify(FilterEvent::Deleted { id: id.to_string() });
            }
            Err(e) => {
                tracing::error!(filter_id = id, "Failed to delete filter: {}", e);
                self.notify(FilterEvent::error(Some(id), format!("Failed to delete filter: {e}")));
            }
        }
        true
    }

    /// Two-phase delete through the filter API
    pub async fn delete_filter<A: FilterApi>(&mut self, api: &A, id: &str) -> Result<()> {
        if !self.begin_delete(id) {
            return Err(Error::Invalid {
                message: format!("cannot delete filter '{id}' now"),
            });
        }
        let result = api.delete_filter(id).await;
        self.finish_delete(id, &result);
        result
    }

    // ==================== Reorder ====================

    /// Store a new display order; it must be a permutation of the current ids
    pub fn reorder(&mut self, ids: &[String]) -> Result<()> {
        let current: AHashSet<&str> = self.filters.iter().map(|f| f.id.as_str()).collect();
        let proposed: AHashSet<&str> = ids.iter().map(String::as_str).collect();
        if ids.len() != self.filters.len() || proposed != current {
            return Err(Error::Invalid {
                message: "reorder must contain exactly the current filter ids".to_string(),
            });
        }

        let mut by_id: AHashMap<String, DashboardFilterConfig> = self
            .filters
            .drain(..)
            .map(|f| (f.id.clone(), f))
            .collect();
        self.filters = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        tracing::debug!(order = ?ids, "Reordered dashboard filters");
        self.notify(FilterEvent::Reordered { ids: ids.to_vec() });
        Ok(())
    }

    // ==================== Getters ====================

    pub fn filters(&self) -> &[DashboardFilterConfig] {
        &self.filters
    }

    pub fn filter_ids(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.id.clone()).collect()
    }

    pub fn value(&self, id: &str) -> Option<&FilterValue> {
        self.current_values.get(id)
    }

    pub fn current_values(&self) -> &AHashMap<String, FilterValue> {
        &self.current_values
    }

    pub fn invalid_reason(&self, id: &str) -> Option<&str> {
        self.invalid.get(id).map(String::as_str)
    }

    pub fn is_applying(&self) -> bool {
        self.is_applying
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.is_some()
    }

    pub fn is_tombstoned(&self, id: &str) -> bool {
        self.locally_deleted_ids.contains(id)
    }
}

impl std::fmt::Debug for FilterPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPanel")
            .field("filters", &self.filter_ids())
            .field("values", &self.current_values.len())
            .field("invalid", &self.invalid.len())
            .field("is_applying", &self.is_applying)
            .field("deleting", &self.deleting)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard_filter::{FilterSettings, FilterType};
    use crate::services::{PreviewKey, PreviewResponse};
    use crossbeam_channel::{Receiver, unbounded};
    use serde_json::json;

    struct FailingApi;

    impl FilterApi for FailingApi {
        async fn preview(&self, _key: &PreviewKey) -> Result<PreviewResponse> {
            Ok(PreviewResponse::Options { options: vec![] })
        }

        async fn delete_filter(&self, _id: &str) -> Result<()> {
            Err(Error::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    fn panel() -> (FilterPanel, Receiver<FilterEvent>) {
        let (tx, rx) = unbounded();
        (FilterPanel::new(tx), rx)
    }

    fn value_filter(id: &str, default: Option<&str>) -> DashboardFilterConfig {
        DashboardFilterConfig::new(id, FilterType::Value, "public", "sales", id).with_settings(
            FilterSettings {
                default_value: default.map(FilterValue::text),
                ..FilterSettings::default()
            },
        )
    }

    #[test]
    fn test_edit_survives_resync() {
        let (mut panel, rx) = panel();
        panel.sync_filters(vec![value_filter("region", Some("APAC"))]);
        assert!(panel.on_change("region", Some(FilterValue::text("EMEA"))));

        panel.sync_filters(vec![value_filter("region", Some("APAC"))]);
        assert_eq!(panel.value("region"), Some(&FilterValue::text("EMEA")));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_invalid_filter_not_seeded_or_editable() {
        let (mut panel, _rx) = panel();
        let mut broken = value_filter("broken", Some("x"));
        broken.table_name.clear();
        panel.sync_filters(vec![broken, value_filter("ok", Some("y"))]);

        assert!(panel.invalid_reason("broken").is_some());
        assert!(panel.value("broken").is_none());
        assert!(!panel.on_change("broken", Some(FilterValue::text("z"))));
        assert_eq!(panel.value("ok"), Some(&FilterValue::text("y")));
        assert_eq!(panel.snapshot().get("broken"), Some(None));
    }

    #[test]
    fn test_edit_dropped_when_filter_turns_invalid() {
        let (mut panel, _rx) = panel();
        panel.sync_filters(vec![value_filter("region", None)]);
        assert!(panel.on_change("region", Some(FilterValue::text("EMEA"))));

        let mut broken = value_filter("region", None);
        broken.column_name.clear();
        panel.sync_filters(vec![broken]);

        assert!(panel.invalid_reason("region").is_some());
        assert!(panel.value("region").is_none());
        assert_eq!(panel.snapshot().get("region"), Some(None));
    }

    #[test]
    fn test_pending_changes_against_last_applied() {
        let (mut panel, _rx) = panel();
        panel.sync_filters(vec![value_filter("region", Some("APAC"))]);
        let applied = panel.begin_apply().expect("apply starts");
        panel.finish_apply();
        assert!(!panel.has_pending_changes(&applied));

        panel.on_change("region", Some(FilterValue::text("EMEA")));
        assert!(panel.has_pending_changes(&applied));
    }

    #[test]
    fn test_unreadable_list_degrades_to_empty() {
        let (mut panel, _rx) = panel();
        panel.sync_filters(vec![value_filter("region", Some("APAC"))]);
        panel.sync_filters_json(&json!({"error": "oops"}));
        assert!(panel.filters().is_empty());
        assert!(panel.current_values().is_empty());
    }

    #[test]
    fn test_unreadable_item_skipped() {
        let (mut panel, _rx) = panel();
        panel.sync_filters_json(&json!([
            {"id": "a", "filter_type": "value", "schema_name": "s", "table_name": "t", "column_name": "c"},
            {"id": "b", "filter_type": "unsupported"}
        ]));
        assert_eq!(panel.filter_ids(), vec!["a".to_string()]);
    }

    #[test]
    fn test_clear_all_notifies_without_apply() {
        let (mut panel, rx) = panel();
        panel.sync_filters(vec![value_filter("region", Some("APAC"))]);
        panel.clear_all();
        assert!(panel.current_values().is_empty());
        assert_eq!(rx.try_recv().ok(), Some(FilterEvent::Cleared));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_reorder_requires_permutation() {
        let (mut panel, rx) = panel();
        panel.sync_filters(vec![value_filter("a", None), value_filter("b", None)]);

        assert!(panel.reorder(&["a".to_string()]).is_err());
        assert!(panel.reorder(&["a".to_string(), "c".to_string()]).is_err());
        assert!(panel.reorder(&["a".to_string(), "a".to_string()]).is_err());

        panel
            .reorder(&["b".to_string(), "a".to_string()])
            .expect("reorder");
        assert_eq!(panel.filter_ids(), vec!["b".to_string(), "a".to_string()]);
        assert!(matches!(rx.try_recv(), Ok(FilterEvent::Reordered { .. })));
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_state() {
        let (mut panel, rx) = panel();
        panel.sync_filters(vec![value_filter("region", Some("APAC"))]);

        let result = panel.delete_filter(&FailingApi, "region").await;
        assert!(result.is_err());
        assert_eq!(panel.filter_ids(), vec!["region".to_string()]);
        assert_eq!(panel.value("region"), Some(&FilterValue::text("APAC")));
        assert!(!panel.is_tombstoned("region"));
        assert!(!panel.is_deleting());
        assert!(matches!(
            rx.try_recv(),
            Ok(FilterEvent::Error { filter_id: Some(id), .. }) if id == "region"
        ));
        assert!(panel.on_change("region", Some(FilterValue::text("EMEA"))));
    }

    #[test]
    fn test_second_delete_rejected_while_pending() {
        let (mut panel, _rx) = panel();
        panel.sync_filters(vec![value_filter("a", None), value_filter("b", None)]);
        assert!(panel.begin_delete("a"));
        assert!(!panel.begin_delete("b"));
        assert!(panel.finish_delete("a", &Ok(())));
        assert!(panel.begin_delete("b"));
    }

    #[test]
    fn test_finish_without_begin_is_ignored() {
        let (mut panel, rx) = panel();
        panel.sync_filters(vec![value_filter("a", None), value_filter("b", None)]);
        assert!(panel.begin_delete("a"));

        assert!(!panel.finish_delete("b", &Ok(())));
        assert!(!panel.is_tombstoned("b"));
        assert_eq!(panel.filter_ids(), vec!["a".to_string(), "b".to_string()]);
        assert!(panel.is_deleting());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_apply_reports_refresh_failure() {
        let (mut panel, rx) = panel();
        panel.sync_filters(vec![value_filter("region", Some("APAC"))]);

        let snapshot = panel
            .apply(|_| async {
                Err(Error::Api {
                    status: 500,
                    message: "refresh failed".to_string(),
                })
            })
            .await;
        assert!(snapshot.is_some());
        assert!(!panel.is_applying());
        assert!(matches!(rx.try_recv(), Ok(FilterEvent::Applied(_))));
        assert!(matches!(rx.try_recv(), Ok(FilterEvent::Error { filter_id: None, .. })));
    }
}
