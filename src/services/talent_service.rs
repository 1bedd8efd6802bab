// src/services/talent_service.rs
//! Talent listing, lookup and maintenance against `/v1/students`

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::{HttpClient, Repository};
use crate::enrichment::Enricher;
use crate::export;
use crate::types::{
    validate_filters, Paginated, PaginationParams, SortField, SortOrder, Talent, TalentFilters,
    TalentStatus,
};

pub const TALENTS_ENDPOINT: &str = "/v1/students";

/// Aggregates over one fetched page of talents
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentStatistics {
    pub total: u64,
    pub sampled: usize,
    pub by_status: HashMap<TalentStatus, usize>,
    pub average_score: Option<f64>,
    pub average_experience: Option<f64>,
    pub top_skills: Vec<(String, usize)>,
}

pub struct TalentService {
    repository: Repository<Talent>,
    enricher: Option<Enricher>,
}

impl TalentService {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self {
            repository: Repository::new(client, TALENTS_ENDPOINT),
            enricher: None,
        }
    }

    /// Fill missing fields of every returned record with seeded demo data
    pub fn with_enrichment(mut self, seed: u64) -> Self {
        self.enricher = Some(Enricher::new(seed));
        self
    }

    /// Filters the listing views start from
    pub fn default_filters() -> TalentFilters {
        TalentFilters {
            sort_by: Some(SortField::CreatedAt),
            sort_order: Some(SortOrder::Desc),
            page: Some(1),
            page_size: Some(10),
            ..Default::default()
        }
    }

    pub async fn list(&self, filters: &TalentFilters) -> Result<Paginated<Talent>> {
        let filters = validate_filters(filters);
        let pagination = filters.pagination();
        // Pagination is rendered by the repository
        let extra = filters
            .to_query()
            .into_iter()
            .filter(|(key, _)| key != "PageNumber" && key != "PageSize")
            .collect();

        let page = self
            .repository
            .find_all(pagination, extra)
            .await
            .context("Failed to load talents")?;

        info!(
            "Loaded {} of {} talents (page {}/{})",
            page.items.len(),
            page.total_count,
            page.page,
            page.total_pages
        );

        Ok(self.enrich_page(page))
    }

    pub async fn get(&self, id: &str) -> Result<Talent> {
        let talent = self
            .repository
            .find_by_id(id)
            .await
            .with_context(|| format!("Failed to load talent {}", id))?;
        Ok(match &self.enricher {
            Some(enricher) => enricher.enrich(&talent, 0),
            None => talent,
        })
    }

    pub async fn create(&self, talent: &Talent) -> Result<Talent> {
        let created = self
            .repository
            .create(talent)
            .await
            .with_context(|| format!("Failed to create talent {}", talent.full_name()))?;
        info!("Created talent {}", created.full_name());
        Ok(created)
    }

    pub async fn update(&self, id: &str, talent: &Talent) -> Result<Talent> {
        self.repository
            .update(id, talent)
            .await
            .with_context(|| format!("Failed to update talent {}", id))
    }

    pub async fn update_status(&self, id: &str, status: TalentStatus) -> Result<Talent> {
        self.repository
            .patch(id, &serde_json::json!({ "status": status.as_str() }))
            .await
            .with_context(|| format!("Failed to change status of talent {}", id))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repository
            .delete(id)
            .await
            .with_context(|| format!("Failed to delete talent {}", id))?;
        info!("Deleted talent {}", id);
        Ok(())
    }

    pub async fn search_by_skill(&self, skill: &str, page: i64) -> Result<Paginated<Talent>> {
        let filters = TalentFilters {
            skills: vec![skill.to_string()],
            page: Some(page),
            ..Self::default_filters()
        };
        self.list(&filters).await
    }

    pub async fn statistics(&self, filters: &TalentFilters) -> Result<TalentStatistics> {
        let page = self.list(filters).await?;
        Ok(compute_statistics(&page))
    }

    /// Every page matching `filters`, for exports
    pub async fn list_all(&self, filters: &TalentFilters) -> Result<Vec<Talent>> {
        let mut filters = validate_filters(filters);
        filters.page_size = Some(crate::types::filters::MAX_PAGE_SIZE);

        let mut talents = Vec::new();
        let mut page_number = 1;
        loop {
            filters.page = Some(page_number);
            let page = self.list(&filters).await?;
            // A server that ignores PageNumber answers with an earlier page again
            if page.page < page_number {
                warn!(
                    "Asked for talents page {} but got page {}, stopping",
                    page_number, page.page
                );
                break;
            }
            let received = page.items.len();
            let has_next = page.has_next();
            talents.extend(page.items);

            if received == 0 || !has_next {
                break;
            }
            page_number += 1;
        }
        Ok(talents)
    }

    pub fn export_csv(&self, talents: &[Talent]) -> Result<String> {
        export::talents_to_csv(talents)
    }

    pub async fn export_csv_to(&self, path: &Path, talents: &[Talent]) -> Result<()> {
        export::write_talents_csv(path, talents).await?;
        info!("Exported {} talents to {}", talents.len(), path.display());
        Ok(())
    }

    pub fn repository(&self) -> &Repository<Talent> {
        &self.repository
    }

    fn enrich_page(&self, page: Paginated<Talent>) -> Paginated<Talent> {
        match &self.enricher {
            Some(enricher) => {
                let offset = (page.page - 1).max(0).saturating_mul(page.page_size.max(0)) as usize;
                let mut index = offset;
                page.map(|talent| {
                    let enriched = enricher.enrich(&talent, index);
                    index += 1;
                    enriched
                })
            }
            None => page,
        }
    }
}

pub fn compute_statistics(page: &Paginated<Talent>) -> TalentStatistics {
    let talents = &page.items;
    let mut by_status: HashMap<TalentStatus, usize> = HashMap::new();
    let mut skill_counts: HashMap<String, usize> = HashMap::new();

    for talent in talents {
        *by_status.entry(talent.status).or_default() += 1;
        for skill in &talent.skills {
            *skill_counts.entry(skill.clone()).or_default() += 1;
        }
    }

    let mean = |values: Vec<f64>| {
        (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
    };

    let mut top_skills: Vec<(String, usize)> = skill_counts.into_iter().collect();
    top_skills.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_skills.truncate(10);

    TalentStatistics {
        total: page.total_count,
        sampled: talents.len(),
        by_status,
        average_score: mean(talents.iter().filter_map(|t| t.score).collect()),
        average_experience: mean(
            talents
                .iter()
                .filter_map(|t| t.years_of_experience.map(f64::from))
                .collect(),
        ),
        top_skills,
    }
}

/// Raw listing without talent parsing, used by the diagnostics command
pub async fn probe(client: &HttpClient, params: PaginationParams) -> Result<Value> {
    client
        .get(
            TALENTS_ENDPOINT,
            crate::core::RequestOptions::with_query(params.to_query()),
        )
        .await
        .context("Probe request failed")
}
