// src/types/response.rs
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::filters::PaginationParams;
use super::normalize::{list_items, pick, pick_i64};

// ===== Paginated listing =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn empty(params: PaginationParams) -> Self {
        let params = params.normalized();
        Self {
            items: Vec::new(),
            total_count: 0,
            page: params.page,
            page_size: params.page_size,
            total_pages: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        (self.page as u64) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

impl<T: DeserializeOwned> Paginated<T> {
    /// Parse any of the listing shapes the backend returns.
    ///
    /// A bare array is one full page. Otherwise missing counters fall back
    /// to the requested page and the number of items received; `total_pages`
    /// is derived when absent.
    pub fn from_value(value: &Value, requested: PaginationParams) -> serde_json::Result<Self> {
        let requested = requested.normalized();
        // Counters may sit on the envelope or on a nested `data` object
        let meta = match value.get("data") {
            Some(inner) if inner.is_object() => inner,
            _ => value,
        };
        let counter = |keys: &[&str]| pick_i64(value, keys).or_else(|| pick_i64(meta, keys));

        let items = list_items(value)
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<serde_json::Result<Vec<T>>>()?;

        // A bare array is the whole result set
        if value.is_array() {
            return Ok(Self {
                total_count: items.len() as u64,
                page: 1,
                page_size: items.len().max(1) as i64,
                total_pages: 1,
                items,
            });
        }

        let total_count = counter(&["totalCount", "total", "count", "totalItems", "totalElements"])
            .map(|n| n.max(0) as u64)
            .unwrap_or(items.len() as u64);
        let page = counter(&["pageNumber", "page", "currentPage"])
            .unwrap_or(requested.page)
            .max(1);
        let page_size = counter(&["pageSize", "size", "perPage", "limit"])
            .unwrap_or(requested.page_size)
            .max(1);
        let total_pages = counter(&["totalPages", "pages", "pageCount"])
            .map(|n| n.max(0) as u64)
            .unwrap_or_else(|| total_count.div_ceil(page_size as u64));

        Ok(Self {
            items,
            total_count,
            page,
            page_size,
            total_pages,
        })
    }
}

/// Human summary line used by the listing views
pub fn professionals_found(total: u64) -> String {
    match total {
        1 => "1 professional found".to_string(),
        n => format!("{} professionals found", n),
    }
}

/// Message carried by an error payload, if any
pub fn error_message(body: &Value) -> Option<String> {
    if let Value::String(text) = body {
        return (!text.trim().is_empty()).then(|| text.trim().to_string());
    }
    pick(body, &["message", "error", "title", "detail", "errorMessage"]).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => error_message(v),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_items_envelope_with_total_count() {
        let page: Paginated<Value> = Paginated::from_value(
            &json!({"totalCount": 5, "items": [{"id": 1}, {"id": 2}]}),
            PaginationParams::new(1, 2),
        )
        .unwrap();

        assert_eq!(page.total_count, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_bare_array_is_one_page() {
        let page: Paginated<u32> =
            Paginated::from_value(&json!([1, 2, 3]), PaginationParams::new(0, 10)).unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);

        // Larger than the requested page size, still a single page
        let page: Paginated<u32> =
            Paginated::from_value(&json!((0..25).collect::<Vec<u32>>()), PaginationParams::new(3, 10))
                .unwrap();
        assert_eq!(page.items.len(), 25);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 25);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
    }

    #[test]
    fn test_nested_data_envelope() {
        let page: Paginated<u32> = Paginated::from_value(
            &json!({"data": {"results": [1], "total": 40, "pageNumber": 4, "totalPages": 40}}),
            PaginationParams::default(),
        )
        .unwrap();
        assert_eq!(page.items, vec![1]);
        assert_eq!(page.total_count, 40);
        assert_eq!(page.page, 4);
        assert_eq!(page.total_pages, 40);
    }

    #[test]
    fn test_professionals_found() {
        assert_eq!(professionals_found(5), "5 professionals found");
        assert_eq!(professionals_found(1), "1 professional found");
        assert_eq!(professionals_found(0), "0 professionals found");
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(&json!({"message": "nope"})).as_deref(), Some("nope"));
        assert_eq!(
            error_message(&json!({"error": {"detail": "bad filter"}})).as_deref(),
            Some("bad filter")
        );
        assert_eq!(error_message(&json!("plain text")).as_deref(), Some("plain text"));
        assert_eq!(error_message(&Value::Null), None);
    }
}
