use crossbeam_channel::{Receiver, unbounded};
use serde_json::json;

use dash_engine::domain::dashboard_filter::{DashboardFilterConfig, FilterSettings, FilterType};
use dash_engine::domain::filter_value::{FilterValue, Scalar};
use dash_engine::error::Result;
use dash_engine::eventing::filter_event::FilterEvent;
use dash_engine::services::{FilterApi, PreviewKey, PreviewResponse};
use dash_engine::state::filter_panel::FilterPanel;

struct OkApi;

impl FilterApi for OkApi {
    async fn preview(&self, _key: &PreviewKey) -> Result<PreviewResponse> {
        Ok(PreviewResponse::Options { options: vec![] })
    }

    async fn delete_filter(&self, _id: &str) -> Result<()> {
        Ok(())
    }
}

fn panel() -> (FilterPanel, Receiver<FilterEvent>) {
    let (tx, rx) = unbounded();
    (FilterPanel::new(tx), rx)
}

fn dashboard_filters() -> Vec<DashboardFilterConfig> {
    vec![
        DashboardFilterConfig::new("Region", FilterType::Value, "public", "sales", "region")
            .with_settings(FilterSettings {
                default_value: Some(FilterValue::text("APAC")),
                ..FilterSettings::default()
            }),
        DashboardFilterConfig::new("Age", FilterType::Numerical, "public", "customers", "age")
            .with_settings(FilterSettings {
                default_min: Some(18.0),
                default_max: Some(65.0),
                ..FilterSettings::default()
            }),
        DashboardFilterConfig::new("Date", FilterType::Datetime, "public", "sales", "sold_at"),
    ]
}

fn plain(id: &str) -> DashboardFilterConfig {
    DashboardFilterConfig::new(id, FilterType::Value, "public", "sales", id)
}

#[test]
fn initial_reconciliation_seeds_defaults_and_apply_is_complete() {
    let (mut panel, rx) = panel();
    panel.sync_filters(dashboard_filters());

    assert_eq!(panel.current_values().len(), 2);
    assert_eq!(panel.value("Region"), Some(&FilterValue::text("APAC")));
    assert_eq!(panel.value("Age"), Some(&FilterValue::range(Some(18.0), Some(65.0))));
    assert!(panel.value("Date").is_none());

    let snapshot = panel.begin_apply().expect("apply starts");
    assert_eq!(
        serde_json::to_value(&snapshot).expect("serialize"),
        json!({"Region": "APAC", "Age": {"min": 18.0, "max": 65.0}, "Date": null})
    );
    assert_eq!(rx.try_recv().ok(), Some(FilterEvent::Applied(snapshot)));
}

#[test]
fn apply_snapshot_has_null_for_unset_filters() {
    let (mut panel, _rx) = panel();
    panel.sync_filters(vec![plain("f1"), plain("f2"), plain("f3")]);
    assert!(panel.on_change("f1", Some(FilterValue::List(vec![Scalar::from("x")]))));

    let snapshot = panel.begin_apply().expect("apply starts");
    assert_eq!(snapshot.ids().collect::<Vec<_>>(), vec!["f1", "f2", "f3"]);
    assert!(snapshot.get("f1").flatten().is_some());
    assert_eq!(snapshot.get("f2"), Some(None));
    assert_eq!(snapshot.get("f3"), Some(None));
}

#[test]
fn second_apply_while_pending_is_rejected() {
    let (mut panel, rx) = panel();
    panel.sync_filters(dashboard_filters());

    assert!(panel.begin_apply().is_some());
    assert!(panel.is_applying());
    assert!(panel.begin_apply().is_none());
    panel.finish_apply();

    let delivered = rx.try_iter().filter(|e| matches!(e, FilterEvent::Applied(_))).count();
    assert_eq!(delivered, 1);
    assert!(panel.begin_apply().is_some());
}

#[test]
fn reconciliation_is_idempotent() {
    let (mut panel, _rx) = panel();
    panel.sync_filters(dashboard_filters());
    let first = panel.current_values().clone();
    panel.sync_filters(dashboard_filters());
    assert_eq!(panel.current_values(), &first);
}

#[test]
fn orphaned_values_are_pruned() {
    let (mut panel, _rx) = panel();
    panel.sync_filters(vec![plain("a"), plain("b")]);
    panel.on_change("a", Some(FilterValue::Scalar(Scalar::Number(1.0))));
    panel.on_change("b", Some(FilterValue::Scalar(Scalar::Number(2.0))));

    panel.sync_filters(vec![plain("a")]);
    assert_eq!(panel.current_values().len(), 1);
    assert_eq!(panel.value("a"), Some(&FilterValue::Scalar(Scalar::Number(1.0))));

    // Not tombstoned, so it may return, but without its old value
    panel.sync_filters(vec![plain("a"), plain("b")]);
    assert_eq!(panel.filters().len(), 2);
    assert!(panel.value("b").is_none());
}

#[test]
fn pending_edits_never_notify() {
    let (mut panel, rx) = panel();
    panel.sync_filters(dashboard_filters());
    panel.on_change("Region", Some(FilterValue::text("EMEA")));
    panel.on_change("Age", None);
    assert!(rx.try_recv().is_err());
    assert!(panel.value("Age").is_none());
}

#[tokio::test]
async fn deleted_filter_stays_deleted_after_stale_refresh() {
    let (mut panel, rx) = panel();
    panel.sync_filters(dashboard_filters());

    panel.delete_filter(&OkApi, "Region").await.expect("delete succeeds");
    assert!(panel.filters().iter().all(|f| f.id != "Region"));
    assert!(panel.value("Region").is_none());
    assert!(panel.is_tombstoned("Region"));
    assert_eq!(
        rx.try_recv().ok(),
        Some(FilterEvent::Deleted {
            id: "Region".to_string()
        })
    );

    panel.sync_filters(dashboard_filters());
    assert_eq!(panel.filter_ids(), vec!["Age".to_string(), "Date".to_string()]);
    assert!(panel.value("Region").is_none());
    assert!(!panel.snapshot().contains("Region"));
}

#[tokio::test]
async fn delete_of_unknown_filter_fails() {
    let (mut panel, _rx) = panel();
    panel.sync_filters(dashboard_filters());
    assert!(panel.delete_filter(&OkApi, "Missing").await.is_err());
    assert!(!panel.is_deleting());
}

#[tokio::test]
async fn apply_runs_refresh_with_snapshot() {
    let (mut panel, _rx) = panel();
    panel.sync_filters(dashboard_filters());

    let mut seen = None;
    let applied = panel
        .apply(|snapshot| {
            seen = Some(snapshot.len());
            async { Ok(()) }
        })
        .await;
    assert_eq!(applied.map(|s| s.len()), Some(3));
    assert_eq!(seen, Some(3));
    assert!(!panel.is_applying());
}

#[test]
fn reordering_keeps_values() {
    let (mut panel, _rx) = panel();
    panel.sync_filters(dashboard_filters());
    let order = vec!["Date".to_string(), "Region".to_string(), "Age".to_string()];
    panel.reorder(&order).expect("valid permutation");

    assert_eq!(panel.filter_ids(), order);
    assert_eq!(panel.value("Region"), Some(&FilterValue::text("APAC")));
    assert_eq!(panel.snapshot().ids().collect::<Vec<_>>(), vec!["Date", "Region", "Age"]);
}
