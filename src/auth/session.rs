use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::domain::KanbanError;

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Authentication context passed explicitly to every backend call.
#[derive(Clone)]
pub struct Session {
    access_token: String,
    refresh_token: Option<String>,
    subject: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Wraps a bearer token. JWT claims are read for expiry only; opaque
    /// tokens never expire locally.
    pub fn new(access_token: impl Into<String>) -> Self {
        let access_token = access_token.into();
        let claims = read_claims(&access_token);
        Self {
            subject: claims.as_ref().and_then(|c| c.sub.clone()),
            expires_at: claims
                .and_then(|c| c.exp)
                .and_then(|exp| DateTime::from_timestamp(exp, 0)),
            access_token,
            refresh_token: None,
        }
    }

    /// Attaches the long-lived credential used by `POST /refresh`.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        let refresh_token = refresh_token.into();
        self.refresh_token = (!refresh_token.is_empty()).then_some(refresh_token);
        self
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    pub fn ensure_valid(&self, now: DateTime<Utc>) -> Result<(), KanbanError> {
        if self.access_token.is_empty() {
            return Err(KanbanError::Unauthorized("missing access token".into()));
        }
        if self.is_expired(now) {
            return Err(KanbanError::Unauthorized("access token expired".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("subject", &self.subject)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// The signing key stays on the server, so the signature is not checked here.
fn read_claims(token: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}
