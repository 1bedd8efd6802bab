// src/context.rs
//! Explicitly constructed services shared by the CLI commands

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::{ConfigManager, FileTokenStore, HttpClient, TokenStore};
use crate::services::{
    AuthService, CatalogService, LanguagesService, MetricsService, ProcessService,
    SkillsService, TalentService,
};

pub struct AppContext {
    pub config: ConfigManager,
    pub client: Arc<HttpClient>,
    pub auth: AuthService,
    pub talents: TalentService,
    pub skills: SkillsService,
    pub languages: LanguagesService,
    pub processes: ProcessService,
    pub metrics: MetricsService,
}

impl AppContext {
    /// Wire every service around one HTTP client and the file session store
    pub async fn build(config: ConfigManager) -> Result<Self> {
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.session_path.clone()));
        Self::with_store(config, store).await
    }

    pub async fn with_store(config: ConfigManager, store: Arc<dyn TokenStore>) -> Result<Self> {
        let mut client = HttpClient::new(&config.api.api_url, config.timeout(), Arc::clone(&store))
            .context("Failed to create API client")?;

        client.add_error_hook(|err| {
            if err.is_unauthorized() {
                warn!("Backend rejected the token; set a fresh one with `wired-people token set`");
            }
            err
        });
        let client = Arc::new(client);

        let auth = AuthService::new(Arc::clone(&client), store, config.login_url());
        if let Some(temp_token) = &config.api.temp_token {
            auth.seed_token(temp_token).await?;
        }

        info!(
            "API client ready: {} (timeout {} ms)",
            config.api.api_url, config.api.timeout_ms
        );

        Ok(Self {
            talents: TalentService::new(Arc::clone(&client)),
            skills: CatalogService::skills(Arc::clone(&client)),
            languages: CatalogService::languages(Arc::clone(&client)),
            processes: ProcessService::new(Arc::clone(&client)),
            metrics: MetricsService::new(Arc::clone(&client)),
            auth,
            client,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config_manager::FileSection;
    use crate::core::MemoryTokenStore;

    #[tokio::test]
    async fn test_temp_token_seeds_empty_session() {
        let config = ConfigManager::from_sources("local".into(), FileSection::default(), |key| {
            (key == "TEMP_TOKEN").then(|| "seeded".to_string())
        })
        .unwrap();

        let context = AppContext::with_store(config, Arc::new(MemoryTokenStore::new()))
            .await
            .unwrap();
        assert_eq!(context.auth.get_token().await.unwrap().as_deref(), Some("seeded"));
        assert_eq!(context.client.base_url(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn test_existing_session_wins_over_temp_token() {
        let config = ConfigManager::from_sources("local".into(), FileSection::default(), |key| {
            (key == "TEMP_TOKEN").then(|| "seeded".to_string())
        })
        .unwrap();

        let context = AppContext::with_store(config, Arc::new(MemoryTokenStore::with_token("mine")))
            .await
            .unwrap();
        assert_eq!(context.auth.get_token().await.unwrap().as_deref(), Some("mine"));
    }
}
