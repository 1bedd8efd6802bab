// src/services/catalog_service.rs
//! Skills and languages catalogs with a time-boxed cache and a static fallback

use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::core::{HttpClient, RequestOptions};
use crate::types::normalize::list_items;
use crate::types::CatalogItem;

pub const SKILLS_ENDPOINT: &str = "/v1/skills";
pub const LANGUAGES_ENDPOINT: &str = "/v1/languages";
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

pub const FALLBACK_SKILLS: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "React",
    "Angular",
    "Vue.js",
    "Node.js",
    "Python",
    "Java",
    "C#",
    ".NET",
    "Go",
    "Rust",
    "Kotlin",
    "Swift",
    "PHP",
    "SQL",
    "Docker",
    "AWS",
];

pub const FALLBACK_LANGUAGES: &[&str] = &[
    "Spanish",
    "English",
    "French",
    "German",
    "Italian",
    "Portuguese",
    "Catalan",
    "Chinese",
];

struct CacheEntry {
    fetched_at: Instant,
    items: Vec<CatalogItem>,
}

/// Single-slot cache: last successful listing plus when it was fetched
pub struct CatalogCache {
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<CacheEntry>> {
        self.entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn fresh(&self) -> Option<Vec<CatalogItem>> {
        self.slot()
            .as_ref()
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.items.clone())
    }

    /// Cached items regardless of age
    pub fn stale(&self) -> Option<Vec<CatalogItem>> {
        self.slot().as_ref().map(|entry| entry.items.clone())
    }

    pub fn store(&self, items: Vec<CatalogItem>) {
        *self.slot() = Some(CacheEntry {
            fetched_at: Instant::now(),
            items,
        });
    }

    pub fn clear(&self) {
        *self.slot() = None;
    }
}

pub struct CatalogService {
    client: Arc<HttpClient>,
    endpoint: &'static str,
    label: &'static str,
    name_keys: &'static [&'static str],
    fallback: &'static [&'static str],
    cache: CatalogCache,
}

pub type SkillsService = CatalogService;
pub type LanguagesService = CatalogService;

impl CatalogService {
    pub fn skills(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            endpoint: SKILLS_ENDPOINT,
            label: "skills",
            name_keys: &["name", "skillName", "skill", "description", "title"],
            fallback: FALLBACK_SKILLS,
            cache: CatalogCache::new(CACHE_TTL),
        }
    }

    pub fn languages(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            endpoint: LANGUAGES_ENDPOINT,
            label: "languages",
            name_keys: &["name", "languageName", "language", "description", "title"],
            fallback: FALLBACK_LANGUAGES,
            cache: CatalogCache::new(CACHE_TTL),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache = CatalogCache::new(ttl);
        self
    }

    /// Catalog entries: fresh cache, else backend, else last known list,
    /// else the built-in list. Never fails.
    pub async fn list(&self) -> Vec<CatalogItem> {
        if let Some(items) = self.cache.fresh() {
            debug!("Serving {} {} from cache", items.len(), self.label);
            return items;
        }

        match self.fetch().await {
            Ok(items) if !items.is_empty() => {
                info!("Loaded {} {} from backend", items.len(), self.label);
                self.cache.store(items.clone());
                items
            }
            Ok(_) => {
                warn!("Backend returned no {}, using fallback list", self.label);
                self.fallback_items()
            }
            Err(e) => {
                warn!("Failed to load {}: {}", self.label, e);
                self.cache.stale().unwrap_or_else(|| self.fallback_items())
            }
        }
    }

    pub async fn names(&self) -> Vec<String> {
        self.list().await.into_iter().map(|item| item.name).collect()
    }

    pub async fn find(&self, name: &str) -> Option<CatalogItem> {
        self.list()
            .await
            .into_iter()
            .find(|item| item.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    async fn fetch(&self) -> Result<Vec<CatalogItem>, crate::core::ApiError> {
        let value: Value = self
            .client
            .get(self.endpoint, RequestOptions::default())
            .await?;

        Ok(list_items(&value)
            .iter()
            .filter_map(|item| CatalogItem::from_value(item, self.name_keys))
            .collect())
    }

    fn fallback_items(&self) -> Vec<CatalogItem> {
        self.fallback.iter().map(|name| CatalogItem::named(name)).collect()
    }
}
