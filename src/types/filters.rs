// src/types/filters.rs
//! Talent listing filters and pagination parameters

use serde::{Deserialize, Serialize};

use super::talent::TalentStatus;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

// ===== Pagination =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// page >= 1, page_size within [1, 100]
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn to_query(self) -> Vec<(String, String)> {
        let params = self.normalized();
        vec![
            ("PageNumber".to_string(), params.page.to_string()),
            ("PageSize".to_string(), params.page_size.to_string()),
        ]
    }
}

// ===== Filters =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Score,
    Experience,
    CreatedAt,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Score => "score",
            Self::Experience => "experience",
            Self::CreatedAt => "createdAt",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentFilters {
    pub search: Option<String>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub status: Option<TalentStatus>,
    pub min_experience: Option<i64>,
    pub max_experience: Option<i64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub location: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Clamp a filter set into the ranges the backend accepts.
///
/// Missing pagination gets the defaults, blank strings are dropped, inverted
/// min/max pairs are swapped after clamping.
pub fn validate_filters(filters: &TalentFilters) -> TalentFilters {
    let pagination = PaginationParams::new(
        filters.page.unwrap_or(DEFAULT_PAGE),
        filters.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .normalized();

    let clamp_score = |score: f64| {
        if score.is_nan() {
            MIN_SCORE
        } else {
            score.clamp(MIN_SCORE, MAX_SCORE)
        }
    };
    let (min_score, max_score) = ordered(
        filters.min_score.map(clamp_score),
        filters.max_score.map(clamp_score),
    );
    let (min_experience, max_experience) = ordered(
        filters.min_experience.map(|years| years.max(0)),
        filters.max_experience.map(|years| years.max(0)),
    );

    TalentFilters {
        search: non_blank(filters.search.as_deref()),
        skills: clean_list(&filters.skills),
        languages: clean_list(&filters.languages),
        status: filters.status.filter(|s| *s != TalentStatus::Unknown),
        min_experience,
        max_experience,
        min_score,
        max_score,
        location: non_blank(filters.location.as_deref()),
        sort_by: filters.sort_by,
        sort_order: filters.sort_order,
        page: Some(pagination.page),
        page_size: Some(pagination.page_size),
    }
}

fn ordered<T: PartialOrd>(min: Option<T>, max: Option<T>) -> (Option<T>, Option<T>) {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
        pair => pair,
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn clean_list(values: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for value in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        if !cleaned.iter().any(|c| c.eq_ignore_ascii_case(value)) {
            cleaned.push(value.to_string());
        }
    }
    cleaned
}

impl TalentFilters {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .normalized()
    }

    /// Query parameters of the validated filter set
    pub fn to_query(&self) -> Vec<(String, String)> {
        let filters = validate_filters(self);
        let mut query = filters.pagination().to_query();

        let mut push = |key: &str, value: String| query.push((key.to_string(), value));

        if let Some(search) = filters.search {
            push("Search", search);
        }
        if !filters.skills.is_empty() {
            push("Skills", filters.skills.join(","));
        }
        if !filters.languages.is_empty() {
            push("Languages", filters.languages.join(","));
        }
        if let Some(status) = filters.status {
            push("Status", status.as_str().to_string());
        }
        if let Some(years) = filters.min_experience {
            push("MinExperience", years.to_string());
        }
        if let Some(years) = filters.max_experience {
            push("MaxExperience", years.to_string());
        }
        if let Some(score) = filters.min_score {
            push("MinScore", score.to_string());
        }
        if let Some(score) = filters.max_score {
            push("MaxScore", score.to_string());
        }
        if let Some(location) = filters.location {
            push("Location", location);
        }
        if let Some(sort_by) = filters.sort_by {
            push("SortBy", sort_by.as_str().to_string());
            push(
                "SortOrder",
                filters.sort_order.unwrap_or_default().as_str().to_string(),
            );
        }

        query
    }

    pub fn is_empty(&self) -> bool {
        let blank = TalentFilters {
            page: self.page,
            page_size: self.page_size,
            ..Default::default()
        };
        *self == blank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters_with_page(page: i64, page_size: i64) -> TalentFilters {
        TalentFilters {
            page: Some(page),
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    #[test]
    fn test_page_below_one_is_clamped() {
        for page in [-50, -1, 0] {
            assert_eq!(validate_filters(&filters_with_page(page, 10)).page, Some(1));
        }
        assert_eq!(validate_filters(&filters_with_page(3, 10)).page, Some(3));
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(validate_filters(&filters_with_page(1, 101)).page_size, Some(100));
        assert_eq!(validate_filters(&filters_with_page(1, 5000)).page_size, Some(100));
        assert_eq!(validate_filters(&filters_with_page(1, 0)).page_size, Some(1));
        assert_eq!(validate_filters(&filters_with_page(1, -3)).page_size, Some(1));
        assert_eq!(validate_filters(&filters_with_page(1, 25)).page_size, Some(25));
    }

    #[test]
    fn test_missing_pagination_gets_defaults() {
        let validated = validate_filters(&TalentFilters::default());
        assert_eq!(validated.page, Some(DEFAULT_PAGE));
        assert_eq!(validated.page_size, Some(DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_scores_are_clamped_into_range() {
        let filters = TalentFilters {
            min_score: Some(-20.0),
            max_score: Some(180.0),
            ..Default::default()
        };
        let validated = validate_filters(&filters);
        assert_eq!(validated.min_score, Some(0.0));
        assert_eq!(validated.max_score, Some(100.0));

        let inverted = TalentFilters {
            min_score: Some(90.0),
            max_score: Some(10.0),
            ..Default::default()
        };
        let validated = validate_filters(&inverted);
        assert_eq!(validated.min_score, Some(10.0));
        assert_eq!(validated.max_score, Some(90.0));
    }

    #[test]
    fn test_query_parameters() {
        let filters = TalentFilters {
            search: Some("  rust ".to_string()),
            skills: vec!["Rust".to_string(), "rust".to_string(), "Go".to_string()],
            status: Some(TalentStatus::Available),
            sort_by: Some(SortField::Score),
            page: Some(0),
            page_size: Some(5),
            ..Default::default()
        };

        let query = filters.to_query();
        let get = |key: &str| {
            query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("PageNumber"), Some("1"));
        assert_eq!(get("PageSize"), Some("5"));
        assert_eq!(get("Search"), Some("rust"));
        assert_eq!(get("Skills"), Some("Rust,Go"));
        assert_eq!(get("Status"), Some("available"));
        assert_eq!(get("SortBy"), Some("score"));
        assert_eq!(get("SortOrder"), Some("asc"));
        assert_eq!(get("Location"), None);
    }

    #[test]
    fn test_is_empty_ignores_pagination() {
        assert!(filters_with_page(4, 20).is_empty());
        let filters = TalentFilters {
            location: Some("Madrid".to_string()),
            ..Default::default()
        };
        assert!(!filters.is_empty());
    }
}
