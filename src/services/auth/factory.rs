//! Factory: build token services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::issuer::JwtIssuer;
use crate::services::auth::keys::KeyError;
use crate::services::auth::verifier::{CredentialVerifier, JwtVerifier};

pub fn build_verifier(config: &Config) -> Result<Arc<dyn CredentialVerifier>, KeyError> {
    let verifier = JwtVerifier::new(
        &config.jwt_keys,
        config.auth_issuer.as_deref(),
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    )?;

    Ok(Arc::new(verifier))
}

/// Only succeeds when the configured keys can sign (HS256 secret or an Ed25519 private key).
pub fn build_issuer(config: &Config) -> Result<JwtIssuer, KeyError> {
    JwtIssuer::new(
        &config.jwt_keys,
        config.auth_issuer.clone(),
        config.auth_audience.clone(),
        config.access_token_ttl_seconds,
    )
}
