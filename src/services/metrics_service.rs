// src/services/metrics_service.rs
//! Admin panel counters under `/v1/panel`

use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;

use crate::core::{HttpClient, RequestOptions};
use crate::types::normalize::list_items;
use crate::types::{CountBucket, PanelMetrics};

pub const PANEL_ENDPOINT: &str = "/v1/panel";

pub struct MetricsService {
    client: Arc<HttpClient>,
}

impl MetricsService {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    async fn fetch(&self, resource: &str) -> Result<Value> {
        let endpoint = format!("{}/{}", PANEL_ENDPOINT, resource);
        self.client
            .get(&endpoint, RequestOptions::default())
            .await
            .with_context(|| format!("Failed to load {}", endpoint))
    }

    pub async fn summary(&self) -> Result<PanelMetrics> {
        Ok(PanelMetrics::from_value(&self.fetch("metrics").await?))
    }

    pub async fn talents_by_status(&self) -> Result<Vec<CountBucket>> {
        Ok(CountBucket::list_from_value(
            &self.fetch("talents-by-status").await?,
        ))
    }

    /// Latest panel events, newest first as sent by the backend
    pub async fn recent_activity(&self) -> Result<Vec<Value>> {
        Ok(list_items(&self.fetch("recent-activity").await?).to_vec())
    }
}
