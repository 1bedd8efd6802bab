// src/types/catalog.rs
//! Skills, languages, recruiting processes and panel metrics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::normalize::{item_name, pick, pick_array, pick_f64, pick_i64, pick_str};
use super::talent::parse_timestamp;

/// Entry of the skills or languages catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: Option<String>,
    pub name: String,
    pub category: Option<String>,
}

impl CatalogItem {
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            category: None,
        }
    }

    /// Bare strings and objects carrying one of `name_keys` are accepted
    pub fn from_value(item: &Value, name_keys: &[&str]) -> Option<Self> {
        let name = item_name(item, name_keys)?;
        Some(Self {
            id: pick_str(item, &["id", "skillId", "languageId", "code"]),
            name,
            category: pick_str(item, &["category", "type", "group"]),
        })
    }
}

// ===== Processes =====

/// A recruiting pipeline instance linking a company to candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Process {
    pub id: Option<String>,
    pub name: String,
    pub company: Option<String>,
    pub status: Option<String>,
    pub candidates: u64,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Value> for Process {
    fn from(value: Value) -> Self {
        let candidates = pick_i64(&value, &["candidates", "candidateCount", "studentsCount"])
            .map(|n| n.max(0) as u64)
            .unwrap_or_else(|| pick_array(&value, &["students", "candidatesList"]).len() as u64);

        Self {
            id: pick_str(&value, &["id", "processId"]),
            name: pick_str(&value, &["name", "title", "processName", "position"])
                .unwrap_or_default(),
            company: pick_str(&value, &["company", "companyName", "client"])
                .or_else(|| {
                    pick(&value, &["company"]).and_then(|c| pick_str(c, &["name", "companyName"]))
                }),
            status: pick_str(&value, &["status", "state"]),
            candidates,
            created_at: pick_str(&value, &["createdAt", "created_at", "startDate"])
                .and_then(|raw| parse_timestamp(&raw)),
        }
    }
}

// ===== Panel metrics =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelMetrics {
    pub total_talents: u64,
    pub active_processes: u64,
    pub hired_this_month: u64,
    pub average_score: Option<f64>,
    /// Counters the backend sends that have no dedicated field
    pub extra: Map<String, Value>,
}

const KNOWN_METRIC_KEYS: &[&str] = &[
    "totalTalents",
    "totalStudents",
    "total_talents",
    "activeProcesses",
    "active_processes",
    "openProcesses",
    "hiredThisMonth",
    "hired_this_month",
    "hired",
    "averageScore",
    "average_score",
    "avgScore",
];

impl PanelMetrics {
    pub fn from_value(value: &Value) -> Self {
        let body = match value.get("data") {
            Some(inner) if inner.is_object() => inner,
            _ => value,
        };
        let count = |keys: &[&str]| pick_i64(body, keys).map(|n| n.max(0) as u64).unwrap_or(0);

        let extra = body
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .filter(|(key, _)| !KNOWN_METRIC_KEYS.contains(&key.as_str()))
                    .map(|(key, v)| (key.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            total_talents: count(&["totalTalents", "totalStudents", "total_talents"]),
            active_processes: count(&["activeProcesses", "active_processes", "openProcesses"]),
            hired_this_month: count(&["hiredThisMonth", "hired_this_month", "hired"]),
            average_score: pick_f64(body, &["averageScore", "average_score", "avgScore"]),
            extra,
        }
    }
}

/// One bucket of a `label -> count` breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountBucket {
    pub label: String,
    pub count: u64,
}

impl CountBucket {
    /// Accepts `[{status|label|name, count|total|value}]` or a `{label: count}` map
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        let body = value.get("data").unwrap_or(value);
        match body {
            Value::Object(map) => map
                .iter()
                .filter_map(|(label, v)| {
                    v.as_u64().map(|count| CountBucket {
                        label: label.clone(),
                        count,
                    })
                })
                .collect(),
            Value::Array(items) => items
                .iter()
                .filter_map(|item| {
                    Some(CountBucket {
                        label: pick_str(item, &["status", "label", "name", "key"])?,
                        count: pick_i64(item, &["count", "total", "value"])?.max(0) as u64,
                    })
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_item_shapes() {
        let keys = ["name", "skillName"];
        assert_eq!(
            CatalogItem::from_value(&json!("Rust"), &keys),
            Some(CatalogItem::named("Rust"))
        );
        let item = CatalogItem::from_value(
            &json!({"id": 3, "skillName": "Kotlin", "category": "Mobile"}),
            &keys,
        )
        .unwrap();
        assert_eq!(item.id.as_deref(), Some("3"));
        assert_eq!(item.name, "Kotlin");
        assert_eq!(item.category.as_deref(), Some("Mobile"));
        assert_eq!(CatalogItem::from_value(&json!({"id": 1}), &keys), None);
    }

    #[test]
    fn test_process_counts_embedded_students() {
        let process = Process::from(json!({
            "processId": "p-1",
            "title": "Backend developer",
            "company": {"name": "Acme"},
            "students": [{}, {}, {}]
        }));
        assert_eq!(process.id.as_deref(), Some("p-1"));
        assert_eq!(process.name, "Backend developer");
        assert_eq!(process.company.as_deref(), Some("Acme"));
        assert_eq!(process.candidates, 3);
    }

    #[test]
    fn test_panel_metrics_keeps_unknown_counters() {
        let metrics = PanelMetrics::from_value(&json!({
            "data": {"totalStudents": 120, "activeProcesses": "8", "avgScore": 71.5, "interviewsToday": 4}
        }));
        assert_eq!(metrics.total_talents, 120);
        assert_eq!(metrics.active_processes, 8);
        assert_eq!(metrics.hired_this_month, 0);
        assert_eq!(metrics.average_score, Some(71.5));
        assert_eq!(metrics.extra.get("interviewsToday"), Some(&json!(4)));
    }

    #[test]
    fn test_count_buckets() {
        let from_map = CountBucket::list_from_value(&json!({"hired": 2}));
        assert_eq!(from_map, vec![CountBucket { label: "hired".into(), count: 2 }]);

        let from_list = CountBucket::list_from_value(&json!([{"status": "available", "total": 9}]));
        assert_eq!(from_list[0].count, 9);
    }
}
