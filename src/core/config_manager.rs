// src/core/config_manager.rs
//! Client configuration: optional config.yaml section overridden by environment variables

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const CONFIG_FILE: &str = "config.yaml";
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Prefix accepted in front of every variable, kept for deployments that
/// share their `.env` with the web front-end
const PUBLIC_PREFIX: &str = "NEXT_PUBLIC_";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub api: ApiConfig,
    pub session_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub api_url: String,
    pub app_url: String,
    pub timeout_ms: u64,
    /// Seeds the session when no token is stored yet
    pub temp_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileSection {
    pub api_url: Option<String>,
    pub app_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub temp_token: Option<String>,
    pub session_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: FileSection,
    #[serde(default)]
    production: FileSection,
}

impl ConfigManager {
    /// Load configuration for the current `ENVIRONMENT` (default `local`)
    pub fn load() -> Result<Self> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string());
        info!("Loading client configuration for environment: {}", environment);

        let section = Self::load_file(Path::new(CONFIG_FILE), &environment)?;
        Self::from_sources(environment, section, |key| std::env::var(key).ok())
    }

    /// Read the section for `environment`; a missing file yields an empty section
    pub fn load_file(path: &Path, environment: &str) -> Result<FileSection> {
        if !path.exists() {
            return Ok(FileSection::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        info!("Loaded configuration file: {}", path.display());
        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    /// Merge a file section with variables from `lookup` (variables win)
    pub fn from_sources<F>(environment: String, section: FileSection, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&format!("{}{}", PUBLIC_PREFIX, key)))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout_ms = match var("API_TIMEOUT") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("API_TIMEOUT must be a number of milliseconds, got '{}'", raw))?,
            None => section.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        };

        let api = ApiConfig {
            api_url: trim_url(
                var("API_URL")
                    .or(section.api_url)
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            ),
            app_url: trim_url(
                var("APP_URL")
                    .or(section.app_url)
                    .unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
            ),
            timeout_ms,
            temp_token: var("TEMP_TOKEN").or(section.temp_token),
        };

        let session_path = var("SESSION_PATH")
            .map(PathBuf::from)
            .or(section.session_path)
            .unwrap_or_else(|| default_session_path(&lookup));

        Ok(Self {
            environment,
            api,
            session_path,
        })
    }

    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api.api_url = trim_url(api_url);
        self
    }

    pub fn with_session_path(mut self, path: PathBuf) -> Self {
        self.session_path = path;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }

    /// Where a logged-out user is sent
    pub fn login_url(&self) -> String {
        format!("{}/login", self.api.app_url)
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn default_session_path<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wired-people")
        .join("session.json")
}
