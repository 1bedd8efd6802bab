// src/listing.rs
//! Pagination and filter state of a talent listing view

use tracing::error;

use crate::services::TalentService;
use crate::types::{professionals_found, validate_filters, Paginated, Talent, TalentFilters};

#[derive(Debug, Clone, Default)]
pub struct ListingState {
    filters: TalentFilters,
    result: Option<Paginated<Talent>>,
    error: Option<String>,
}

impl ListingState {
    pub fn new(filters: TalentFilters) -> Self {
        Self {
            filters: validate_filters(&filters),
            result: None,
            error: None,
        }
    }

    pub fn filters(&self) -> &TalentFilters {
        &self.filters
    }

    pub fn result(&self) -> Option<&Paginated<Talent>> {
        self.result.as_ref()
    }

    pub fn talents(&self) -> &[Talent] {
        self.result
            .as_ref()
            .map(|page| page.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn page(&self) -> i64 {
        self.filters.pagination().page
    }

    /// Replace the filters and go back to the first page
    pub fn set_filters(&mut self, filters: TalentFilters) {
        let page_size = filters.page_size.or(self.filters.page_size);
        self.filters = validate_filters(&TalentFilters {
            page: Some(1),
            page_size,
            ..filters
        });
    }

    pub fn set_search(&mut self, search: Option<String>) {
        let filters = TalentFilters {
            search,
            ..self.filters.clone()
        };
        self.set_filters(filters);
    }

    pub fn set_page_size(&mut self, page_size: i64) {
        let filters = TalentFilters {
            page_size: Some(page_size),
            ..self.filters.clone()
        };
        self.set_filters(filters);
    }

    /// Drop every filter, keeping only the page size
    pub fn clear_filters(&mut self) {
        self.set_filters(TalentFilters {
            page_size: self.filters.page_size,
            ..Default::default()
        });
    }

    fn total_pages(&self) -> i64 {
        self.result
            .as_ref()
            .map(|page| page.total_pages.max(1) as i64)
            .unwrap_or(1)
    }

    /// Jump to `page`, clamped to the pages known from the last result
    pub fn go_to(&mut self, page: i64) -> i64 {
        let target = page.clamp(1, self.total_pages());
        self.filters.page = Some(target);
        target
    }

    /// Advance one page; `false` when already on the last one
    pub fn next_page(&mut self) -> bool {
        let current = self.page();
        current != self.go_to(current + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        let current = self.page();
        current != self.go_to(current - 1)
    }

    /// Fetch the current page; failures are kept as the error message
    pub async fn refresh(&mut self, service: &TalentService) {
        match service.list(&self.filters).await {
            Ok(page) => {
                self.result = Some(page);
                self.error = None;
            }
            Err(e) => {
                error!("Talent listing failed: {:#}", e);
                self.error = Some(format!("Could not load professionals: {}", e));
            }
        }
    }

    pub fn summary(&self) -> String {
        professionals_found(self.result.as_ref().map(|page| page.total_count).unwrap_or(0))
    }
}
