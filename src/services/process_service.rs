// src/services/process_service.rs
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;

use crate::core::{HttpClient, Repository, RequestOptions};
use crate::types::normalize::list_items;
use crate::types::{Paginated, PaginationParams, Process, Talent};

pub const PROCESSES_ENDPOINT: &str = "/v1/processes";

pub struct ProcessService {
    repository: Repository<Process>,
}

impl ProcessService {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self {
            repository: Repository::new(client, PROCESSES_ENDPOINT),
        }
    }

    pub async fn list(&self, params: PaginationParams) -> Result<Paginated<Process>> {
        self.repository
            .find_all(params, Vec::new())
            .await
            .context("Failed to load processes")
    }

    pub async fn get(&self, id: &str) -> Result<Process> {
        self.repository
            .find_by_id(id)
            .await
            .with_context(|| format!("Failed to load process {}", id))
    }

    pub async fn create(&self, process: &Process) -> Result<Process> {
        self.repository
            .create(process)
            .await
            .with_context(|| format!("Failed to create process {}", process.name))
    }

    pub async fn update(&self, id: &str, process: &Process) -> Result<Process> {
        self.repository
            .update(id, process)
            .await
            .with_context(|| format!("Failed to update process {}", id))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repository
            .delete(id)
            .await
            .with_context(|| format!("Failed to delete process {}", id))
    }

    /// Talents attached to a process
    pub async fn candidates(&self, id: &str) -> Result<Vec<Talent>> {
        let endpoint = format!("{}/{}/students", self.repository.endpoint(), id);
        let value: Value = self
            .repository
            .client()
            .get(&endpoint, RequestOptions::default())
            .await
            .with_context(|| format!("Failed to load candidates of process {}", id))?;

        Ok(list_items(&value)
            .iter()
            .cloned()
            .map(Talent::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryTokenStore;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> ProcessService {
        let client = HttpClient::new(
            &server.uri(),
            Duration::from_secs(5),
            Arc::new(MemoryTokenStore::with_token("abc")),
        )
        .unwrap();
        ProcessService::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_list_processes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PROCESSES_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 1, "name": "Frontend", "companyName": "Acme", "candidateCount": 4}],
                "total": 1
            })))
            .mount(&server)
            .await;

        let page = service(&server).list(PaginationParams::default()).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].company.as_deref(), Some("Acme"));
        assert_eq!(page.items[0].candidates, 4);
    }

    #[tokio::test]
    async fn test_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/processes/3/students"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 10, "firstName": "Ana"},
                {"id": 11, "firstName": "Ben"}
            ])))
            .mount(&server)
            .await;

        let candidates = service(&server).candidates("3").await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].first_name, "Ben");
    }
}
