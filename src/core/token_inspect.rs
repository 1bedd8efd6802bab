// src/core/token_inspect.rs
//! Read the claims of a bearer token without verifying it.
//!
//! Only used to show who a pasted token belongs to and when it expires; the
//! backend remains the authority on whether the token is accepted.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::Serialize;
use serde_json::Value;

use crate::types::normalize::{pick_i64, pick_str};

#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub algorithm: String,
    pub subject: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub claims: Value,
}

impl TokenInfo {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Time left before expiry; `None` for tokens without `exp`
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .map(|exp| (exp - now).max(Duration::zero()))
    }
}

/// Decode the header and payload of a JWT, ignoring its signature
pub fn inspect_token(token: &str) -> Result<TokenInfo> {
    let token = token.trim().trim_start_matches("Bearer ").trim();

    let header = decode_header(token).context("Token is not a well-formed JWT")?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Value>(token, &DecodingKey::from_secret(&[]), &validation)
        .context("Failed to decode token payload")?;
    let claims = data.claims;

    let timestamp = |keys: &[&str]| {
        pick_i64(&claims, keys).and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    };

    Ok(TokenInfo {
        algorithm: format!("{:?}", header.alg),
        subject: pick_str(&claims, &["sub", "nameid", "userId"]),
        email: pick_str(
            &claims,
            &[
                "email",
                "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress",
            ],
        ),
        name: pick_str(
            &claims,
            &[
                "name",
                "unique_name",
                "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name",
            ],
        ),
        role: pick_str(
            &claims,
            &[
                "role",
                "http://schemas.microsoft.com/ws/2008/06/identity/claims/role",
            ],
        ),
        issued_at: timestamp(&["iat"]),
        expires_at: timestamp(&["exp"]),
        claims,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token_with(claims: Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"backend-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_inspect_reads_claims_without_secret() {
        let token = token_with(json!({
            "sub": "17",
            "email": "admin@wiredpeople.io",
            "role": "Admin",
            "iat": 1_700_000_000,
            "exp": 1_700_003_600,
            "aud": "wired-people"
        }));

        let info = inspect_token(&format!("Bearer {}", token)).unwrap();
        assert_eq!(info.algorithm, "HS256");
        assert_eq!(info.subject.as_deref(), Some("17"));
        assert_eq!(info.email.as_deref(), Some("admin@wiredpeople.io"));
        assert_eq!(info.role.as_deref(), Some("Admin"));

        let exp = info.expires_at.unwrap();
        assert!(info.is_expired(exp));
        assert!(!info.is_expired(exp - Duration::seconds(1)));
        assert_eq!(
            info.remaining(exp - Duration::minutes(5)),
            Some(Duration::minutes(5))
        );
        assert_eq!(info.remaining(exp + Duration::hours(1)), Some(Duration::zero()));
    }

    #[test]
    fn test_token_without_expiry_never_expires() {
        let info = inspect_token(&token_with(json!({"sub": "1"}))).unwrap();
        assert!(info.expires_at.is_none());
        assert!(!info.is_expired(Utc::now()));
        assert!(info.remaining(Utc::now()).is_none());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(inspect_token("not-a-jwt").is_err());
        assert!(inspect_token("").is_err());
    }
}
