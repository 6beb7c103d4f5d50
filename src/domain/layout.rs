//! Layout - Dashboard Grid Layout
//!
//! Saved layouts come in several legacy shapes. [`DashboardLayout::normalize`]
//! maps each of them onto one list of grid items at the boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One chart's position on the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItem {
    pub chart_id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChartId {
    Int(i64),
    Str(String),
}

impl ChartId {
    fn into_string(self) -> String {
        match self {
            ChartId::Int(id) => id.to_string(),
            ChartId::Str(id) => id,
        }
    }
}

fn one() -> u32 {
    1
}

#[derive(Deserialize)]
struct RawItem {
    #[serde(default, alias = "i", alias = "id")]
    chart_id: Option<ChartId>,
    #[serde(default)]
    x: u32,
    #[serde(default)]
    y: u32,
    #[serde(default = "one")]
    w: u32,
    #[serde(default = "one")]
    h: u32,
}

impl RawItem {
    fn into_item(self, chart_id: String) -> LayoutItem {
        LayoutItem {
            chart_id,
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

/// Canonical dashboard layout, ordered top-to-bottom then left-to-right
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardLayout {
    items: Vec<LayoutItem>,
}

impl DashboardLayout {
    /// Normalize any supported layout shape
    ///
    /// Accepted: a bare item array, `{"items": [...]}`, `{"layout": [...]}`,
    /// or an object keyed by chart id. Anything else yields an empty layout.
    pub fn normalize(raw: &Value) -> Self {
        let mut items = match raw {
            Value::Array(list) => parse_list(list),
            Value::Object(map) => match (map.get("items"), map.get("layout")) {
                (Some(Value::Array(list)), _) | (None, Some(Value::Array(list))) => {
                    parse_list(list)
                }
                _ if !map.is_empty() && map.values().all(Value::is_object) => map
                    .iter()
                    .filter_map(|(chart_id, item)| {
                        parse_raw(item).map(|raw| raw.into_item(chart_id.clone()))
                    })
                    .collect(),
                _ => {
                    tracing::warn!("Unrecognized dashboard layout object; using empty layout");
                    Vec::new()
                }
            },
            Value::Null => Vec::new(),
            other => {
                tracing::warn!(kind = json_kind(other), "Unrecognized dashboard layout; using empty layout");
                Vec::new()
            }
        };
        items.sort_by(|a, b| (a.y, a.x).cmp(&(b.y, b.x)));
        Self { items }
    }

    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

fn parse_raw(item: &Value) -> Option<RawItem> {
    serde_json::from_value(item.clone())
        .map_err(|e| tracing::warn!("Skipping unreadable layout item: {}", e))
        .ok()
}

fn parse_list(list: &[Value]) -> Vec<LayoutItem> {
    list.iter()
        .filter_map(parse_raw)
        .filter_map(|mut raw| match raw.chart_id.take() {
            Some(id) => Some(raw.into_item(id.into_string())),
            None => {
                tracing::warn!("Skipping layout item without a chart id");
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(layout: &DashboardLayout) -> Vec<&str> {
        layout.items().iter().map(|item| item.chart_id.as_str()).collect()
    }

    #[test]
    fn test_bare_array() {
        let layout = DashboardLayout::normalize(&json!([
            {"chart_id": 2, "x": 6, "y": 0, "w": 6, "h": 4},
            {"chart_id": "1", "x": 0, "y": 0, "w": 6, "h": 4},
            {"chart_id": 3, "x": 0, "y": 4, "w": 12, "h": 3}
        ]));
        assert_eq!(ids(&layout), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_wrapped_arrays() {
        let items = DashboardLayout::normalize(&json!({"items": [{"i": "a", "x": 1, "y": 1}]}));
        assert_eq!(
            items.items(),
            &[LayoutItem {
                chart_id: "a".to_string(),
                x: 1,
                y: 1,
                w: 1,
                h: 1,
            }]
        );

        let layout = DashboardLayout::normalize(&json!({"layout": [{"id": 7, "x": 0, "y": 0}]}));
        assert_eq!(ids(&layout), vec!["7"]);
    }

    #[test]
    fn test_map_keyed_by_chart() {
        let layout = DashboardLayout::normalize(&json!({
            "10": {"x": 0, "y": 2, "w": 4, "h": 2},
            "11": {"x": 0, "y": 0, "w": 4, "h": 2}
        }));
        assert_eq!(ids(&layout), vec!["11", "10"]);
        assert_eq!(layout.items()[1].w, 4);
    }

    #[test]
    fn test_unknown_shapes_are_empty() {
        assert!(DashboardLayout::normalize(&json!("grid")).is_empty());
        assert!(DashboardLayout::normalize(&json!({"columns": 12})).is_empty());
        assert!(DashboardLayout::normalize(&Value::Null).is_empty());
        assert_eq!(DashboardLayout::normalize(&json!([{"x": 1}, {"chart_id": 1}])).len(), 1);
    }
}
