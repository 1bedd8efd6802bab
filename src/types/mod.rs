// src/types/mod.rs
pub mod catalog;
pub mod filters;
pub mod normalize;
pub mod response;
pub mod talent;

pub use catalog::{CatalogItem, CountBucket, PanelMetrics, Process};
pub use filters::{validate_filters, PaginationParams, SortField, SortOrder, TalentFilters};
pub use response::{professionals_found, Paginated};
pub use talent::{Education, Experience, LanguageSkill, SalaryRange, Talent, TalentStatus};
