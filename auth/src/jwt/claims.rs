use std::collections::HashMap;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claim key holding the identity's username.
pub const USERNAME_CLAIM: &str = "unique_name";

/// Session claims carried by an access token.
///
/// Standard RFC 7519 fields plus custom fields via `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Claims {
    /// Subject (identity id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for an authenticated identity, expiring `expiration_hours` after `issued_at`.
    ///
    /// Lifetimes beyond the representable range saturate at the latest instant.
    ///
    /// # Arguments
    /// * `identity_id` - Identity identifier (becomes `sub`)
    /// * `username` - Username (stored under `unique_name`)
    /// * `issued_at` - Issuance instant
    /// * `expiration_hours` - Hours until token expires
    pub fn for_identity(
        identity_id: impl ToString,
        username: &str,
        issued_at: DateTime<Utc>,
        expiration_hours: i64,
    ) -> Self {
        let expiration = Duration::try_hours(expiration_hours)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self::new()
            .with_subject(identity_id)
            .with_issued_at(issued_at.timestamp())
            .with_expiration(expiration.timestamp())
            .with_extra(USERNAME_CLAIM, username)
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    pub fn with_issuer(mut self, iss: impl ToString) -> Self {
        self.iss = Some(iss.to_string());
        self
    }

    pub fn with_audience(mut self, aud: impl ToString) -> Self {
        self.aud = Some(aud.to_string());
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Username carried in the token, if any.
    pub fn username(&self) -> Option<&str> {
        self.extra.get(USERNAME_CLAIM).and_then(|v| v.as_str())
    }
}
