use chrono::{Duration, TimeZone, Utc};

use dash_engine::components::data_table::{
    ColumnFilterValue, DateFilterValue, DateRange, FilterKind, FilterState, SortDirection,
    SortState, TableBody, TableEvent, TableStatus, VecDataProvider,
};
use dash_engine::domain::dashboard::Dashboard;
use dash_engine::features::dashboards::dashboard_table;
use dash_engine::settings::Settings;

fn dashboard(id: i64, landing: bool) -> Dashboard {
    Dashboard {
        id,
        title: format!("Dashboard {id}"),
        owner: Some("ops".to_string()),
        last_modified: Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid time")
            + Duration::hours(id),
        is_favorite: false,
        is_landing_page: landing,
        chart_count: 1,
    }
}

fn settings(page_size: usize) -> Settings {
    Settings {
        page_size,
        page_size_options: vec![page_size],
        ..Settings::default()
    }
}

#[test]
fn sort_toggle_cycle() {
    let mut table = dashboard_table(&Settings::default()).expect("table");

    let Some(TableEvent::SortChanged(first)) = table.toggle_sort(&SortState::none(), "chart_count")
    else {
        panic!("expected sort change");
    };
    assert_eq!(first, SortState::by("chart_count", SortDirection::Desc));

    let Some(TableEvent::SortChanged(second)) = table.toggle_sort(&first, "chart_count") else {
        panic!("expected sort change");
    };
    assert_eq!(second, SortState::by("chart_count", SortDirection::Asc));

    let Some(TableEvent::SortChanged(other)) = table.toggle_sort(&second, "last_modified") else {
        panic!("expected sort change");
    };
    assert_eq!(other, SortState::by("last_modified", SortDirection::Desc));
}

#[test]
fn pinned_rows_render_on_every_page() {
    let (sort, filters) = (SortState::none(), FilterState::new());
    for pinned_count in [0usize, 1, 3] {
        for total in [1usize, 7, 10, 23] {
            for page_size in [5usize, 10] {
                let mut table = dashboard_table(&settings(page_size)).expect("table");
                let pinned: Vec<_> = (0..pinned_count)
                    .map(|i| dashboard(1000 + i as i64, true))
                    .collect();
                let provider =
                    VecDataProvider::new((0..total).map(|i| dashboard(i as i64, false)).collect());

                let page_count = total.div_ceil(page_size);
                for page in 0..page_count {
                    if page > 0 {
                        assert!(table.next_page().is_some());
                    }
                    let view = table.view(&provider, &pinned, &sort, &filters, &TableStatus::Ready);
                    let expected = pinned_count + page_size.min(total - page * page_size);
                    assert_eq!(view.rendered_row_count(), expected);

                    let TableBody::Rows {
                        pinned: shown,
                        footer,
                        ..
                    } = view.body
                    else {
                        panic!("expected rows");
                    };
                    let ids: Vec<i64> = shown.iter().map(|row| row.row.id).collect();
                    let want: Vec<i64> = pinned.iter().map(|d| d.id).collect();
                    assert_eq!(ids, want);
                    assert_eq!(footer.total, total);
                }
                assert!(table.next_page().is_none());
            }
        }
    }
}

#[test]
fn filter_emptiness_rules() {
    assert!(!ColumnFilterValue::empty(FilterKind::Text).is_active());
    assert!(ColumnFilterValue::text("q").is_active());
    let mut favorites = ColumnFilterValue::empty(FilterKind::Text);
    if let ColumnFilterValue::Text { flags, .. } = &mut favorites {
        flags.insert("favorites".to_string(), true);
    }
    assert!(favorites.is_active());

    assert!(!ColumnFilterValue::empty(FilterKind::Checkbox).is_active());
    assert!(ColumnFilterValue::checkbox(["ops"]).is_active());

    assert!(!ColumnFilterValue::empty(FilterKind::Date).is_active());
    assert!(ColumnFilterValue::Date(DateFilterValue::with_range(DateRange::Today)).is_active());
}

#[test]
fn clearing_one_column_keeps_the_others() {
    let mut table = dashboard_table(&Settings::default()).expect("table");
    let mut filters = FilterState::new();
    filters.set("title", ColumnFilterValue::text("sales"));
    filters.set("owner", ColumnFilterValue::checkbox(["ops"]));

    let Some(TableEvent::FilterChanged(next)) = table.clear_filter(&filters, "title") else {
        panic!("expected filter change");
    };
    assert!(!next.is_active("title"));
    assert!(next.is_active("owner"));
}

#[test]
fn page_clamps_when_data_shrinks() {
    let mut table = dashboard_table(&settings(5)).expect("table");
    let (sort, filters) = (SortState::none(), FilterState::new());
    let many = VecDataProvider::new((0..12).map(|i| dashboard(i, false)).collect());
    table.view(&many, &[], &sort, &filters, &TableStatus::Ready);
    assert!(table.go_to_page(2).is_some());

    let few = VecDataProvider::new((0..3).map(|i| dashboard(i, false)).collect());
    let view = table.view(&few, &[], &sort, &filters, &TableStatus::Ready);
    let TableBody::Rows { rows, footer, .. } = view.body else {
        panic!("expected rows");
    };
    assert_eq!(footer.page_index, 0);
    assert_eq!(rows.len(), 3);
}

#[test]
fn empty_state_unless_pinned_rows() {
    let mut table = dashboard_table(&Settings::default()).expect("table");
    let (sort, filters) = (SortState::none(), FilterState::new());
    let empty = VecDataProvider::new(Vec::new());

    let view = table.view(&empty, &[], &sort, &filters, &TableStatus::Ready);
    assert!(matches!(view.body, TableBody::Empty(_)));

    let pinned = vec![dashboard(1, true)];
    let view = table.view(&empty, &pinned, &sort, &filters, &TableStatus::Ready);
    assert_eq!(view.rendered_row_count(), 1);

    let error = TableStatus::Error {
        message: "list failed".to_string(),
        can_retry: true,
    };
    let view = table.view(&empty, &pinned, &sort, &filters, &error);
    assert!(matches!(view.body, TableBody::Error { .. }));
    assert_eq!(table.retry(&error), Some(TableEvent::Retry));
}
