use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::claims::AccessClaims;
use crate::services::auth::keys::{JwtKeys, KeyError};

/// The user an access token is issued for.
#[derive(Debug, Clone)]
pub struct Subject {
    pub user_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub role_id: Option<i64>,
}

/// Signs access tokens with the same key configuration the verifier checks against.
#[derive(Clone)]
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    algorithm: Algorithm,
    issuer: Option<String>,
    audience: Option<String>,
    ttl_seconds: u64,
}

impl JwtIssuer {
    pub fn new(
        keys: &JwtKeys,
        issuer: Option<String>,
        audience: Option<String>,
        ttl_seconds: u64,
    ) -> Result<Self, KeyError> {
        Ok(Self {
            encoding_key: keys.encoding_key()?,
            algorithm: keys.algorithm(),
            issuer,
            audience,
            ttl_seconds,
        })
    }

    /// Issue an access token valid from now for `ttl_seconds`.
    pub fn issue(&self, subject: &Subject) -> Result<String, AppError> {
        self.issue_at(subject, chrono::Utc::now().timestamp())
    }

    /// Issue an access token as if it had been issued at `issued_at` (unix seconds).
    pub fn issue_at(&self, subject: &Subject, issued_at: i64) -> Result<String, AppError> {
        let claims = self.claims_for(subject, issued_at)?;
        self.sign(&claims)
    }

    pub fn claims_for(&self, subject: &Subject, issued_at: i64) -> Result<AccessClaims, AppError> {
        let exp = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(|ttl| issued_at.checked_add(ttl))
            .ok_or_else(|| {
                error!(ttl_seconds = self.ttl_seconds, issued_at, "token lifetime out of range");
                AppError::Internal
            })?;

        let mut extra = Map::new();
        if let Some(iss) = &self.issuer {
            extra.insert("iss".to_string(), Value::String(iss.clone()));
        }
        if let Some(aud) = &self.audience {
            extra.insert("aud".to_string(), Value::String(aud.clone()));
        }
        extra.insert("jti".to_string(), Value::String(Uuid::new_v4().to_string()));

        Ok(AccessClaims {
            sub: subject.user_id,
            username: subject.username.clone(),
            email: subject.email.clone(),
            role_id: subject.role_id,
            exp,
            iat: Some(issued_at),
            extra,
        })
    }

    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, AppError> {
        let mut header = Header::new(self.algorithm);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::Internal
        })
    }
}
