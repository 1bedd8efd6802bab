// src/services/auth_service.rs
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::core::{HttpClient, RequestOptions, Session, TokenStore};
use crate::types::normalize::{pick, pick_str};

pub const AUTH_ENDPOINT: &str = "/auth";

/// Published whenever the stored token changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEvent {
    Set,
    Removed,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: Option<Value>,
}

pub struct AuthService {
    client: Arc<HttpClient>,
    store: Arc<dyn TokenStore>,
    events: broadcast::Sender<TokenEvent>,
    login_url: String,
}

impl AuthService {
    pub fn new(client: Arc<HttpClient>, store: Arc<dyn TokenStore>, login_url: String) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            client,
            store,
            events,
            login_url,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TokenEvent> {
        self.events.subscribe()
    }

    /// Exchange credentials for a token and store the session
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let response: Value = self
            .client
            .post(AUTH_ENDPOINT, &Credentials { email, password }, RequestOptions::default())
            .await
            .context("Login request failed")?;

        let payload = match response.get("data") {
            Some(inner) if inner.is_object() => inner,
            _ => &response,
        };

        let token = pick_str(payload, &["token", "accessToken", "access_token", "jwt"])
            .ok_or_else(|| anyhow::anyhow!("Login response did not contain a token"))?;
        let user = pick(payload, &["user", "account", "profile"]).cloned();

        self.store
            .save(&Session {
                token: Some(token.clone()),
                user: user.clone(),
            })
            .await
            .context("Failed to store session")?;
        self.notify(TokenEvent::Set);

        info!("Logged in as {}", email);
        Ok(LoginOutcome { token, user })
    }

    /// Drop the session and return the URL a user should be sent to
    pub async fn logout(&self) -> Result<String> {
        self.store.clear().await.context("Failed to clear session")?;
        self.notify(TokenEvent::Removed);
        info!("Logged out");
        Ok(self.login_url.clone())
    }

    pub async fn get_token(&self) -> Result<Option<String>> {
        self.store.token().await
    }

    /// Replace the token, keeping the stored user
    pub async fn set_token(&self, token: &str) -> Result<()> {
        let token = token.trim().trim_start_matches("Bearer ").trim();
        if token.is_empty() {
            anyhow::bail!("Refusing to store an empty token");
        }

        let mut session = self.store.load().await.unwrap_or_else(|e| {
            warn!("Discarding unreadable session: {}", e);
            Session::default()
        });
        session.token = Some(token.to_string());
        self.store.save(&session).await.context("Failed to store token")?;
        self.notify(TokenEvent::Set);
        Ok(())
    }

    pub async fn remove_token(&self) -> Result<()> {
        self.store.clear().await.context("Failed to remove token")?;
        self.notify(TokenEvent::Removed);
        Ok(())
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(self.get_token().await, Ok(Some(_)))
    }

    pub async fn current_user(&self) -> Result<Option<Value>> {
        Ok(self.store.load().await?.user)
    }

    /// Store `token` only when no session exists yet
    pub async fn seed_token(&self, token: &str) -> Result<bool> {
        if self.is_authenticated().await {
            return Ok(false);
        }
        self.set_token(token).await?;
        info!("Seeded session from configured temporary token");
        Ok(true)
    }

    /// The backend has no refresh flow
    pub async fn refresh_token(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn notify(&self, event: TokenEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryTokenStore;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server_uri: &str) -> AuthService {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let client = HttpClient::new(server_uri, Duration::from_secs(5), Arc::clone(&store)).unwrap();
        AuthService::new(Arc::new(client), store, "http://app.local/login".to_string())
    }

    #[tokio::test]
    async fn test_token_round_trip() {
        let auth = service("http://127.0.0.1:1");
        assert_eq!(auth.get_token().await.unwrap(), None);
        assert!(!auth.is_authenticated().await);

        auth.set_token("abc").await.unwrap();
        assert_eq!(auth.get_token().await.unwrap().as_deref(), Some("abc"));
        assert!(auth.is_authenticated().await);

        auth.remove_token().await.unwrap();
        assert_eq!(auth.get_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_token_strips_bearer_prefix_and_rejects_empty() {
        let auth = service("http://127.0.0.1:1");
        auth.set_token("  Bearer xyz ").await.unwrap();
        assert_eq!(auth.get_token().await.unwrap().as_deref(), Some("xyz"));
        assert!(auth.set_token("   ").await.is_err());
    }

    #[tokio::test]
    async fn test_events_are_published() {
        let auth = service("http://127.0.0.1:1");
        let mut events = auth.subscribe();

        auth.set_token("abc").await.unwrap();
        let login_url = auth.logout().await.unwrap();

        assert_eq!(events.recv().await.unwrap(), TokenEvent::Set);
        assert_eq!(events.recv().await.unwrap(), TokenEvent::Removed);
        assert_eq!(login_url, "http://app.local/login");
    }

    #[tokio::test]
    async fn test_login_stores_token_and_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(AUTH_ENDPOINT))
            .and(body_json(json!({"email": "admin@wiredpeople.io", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"accessToken": "jwt-123", "user": {"name": "Admin"}}
            })))
            .mount(&server)
            .await;

        let auth = service(&server.uri());
        let outcome = auth.login("admin@wiredpeople.io", "secret").await.unwrap();

        assert_eq!(outcome.token, "jwt-123");
        assert_eq!(auth.get_token().await.unwrap().as_deref(), Some("jwt-123"));
        assert_eq!(auth.current_user().await.unwrap().unwrap()["name"], "Admin");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"email": "bad@wiredpeople.io", "password": "x"})))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_json(json!({"email": "odd@wiredpeople.io", "password": "x"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let auth = service(&server.uri());

        let err = auth.login("bad@wiredpeople.io", "x").await.unwrap_err();
        let api_err = err.downcast_ref::<crate::core::ApiError>().unwrap();
        assert_eq!(api_err.status().map(|s| s.as_u16()), Some(401));

        assert!(auth.login("odd@wiredpeople.io", "x").await.is_err());
        assert!(!auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_seed_token_only_when_empty() {
        let auth = service("http://127.0.0.1:1");
        assert!(auth.seed_token("temp").await.unwrap());
        assert!(!auth.seed_token("other").await.unwrap());
        assert_eq!(auth.get_token().await.unwrap().as_deref(), Some("temp"));
        assert_eq!(auth.refresh_token().await.unwrap(), None);
    }
}
