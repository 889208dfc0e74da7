/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可、JWT 鍵、HTTP 制限など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::services::auth::keys::JwtKeys;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_value(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub jwt_keys: JwtKeys,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,
    pub access_token_ttl_seconds: u64,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` is the production entry point; tests feed a map instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::from_value(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwt_keys = jwt_keys_from(&lookup)?;

        let auth_issuer = non_empty(lookup("AUTH_ISSUER"));
        let auth_audience = non_empty(lookup("AUTH_AUDIENCE"));

        let access_token_leeway_seconds: u64 = parse_or(&lookup, "ACCESS_TOKEN_LEEWAY_SECONDS", 0)?;
        let access_token_ttl_seconds: u64 = parse_or(&lookup, "ACCESS_TOKEN_TTL_SECONDS", 86_400)?; // 1 day
        // exp = iat + ttl is computed in signed unix seconds
        if access_token_ttl_seconds == 0 || i64::try_from(access_token_ttl_seconds).is_err() {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
        }

        let request_timeout_seconds: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        let request_body_limit_bytes: usize = parse_or(&lookup, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            jwt_keys,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            access_token_ttl_seconds,
            request_timeout: Duration::from_secs(request_timeout_seconds),
            request_body_limit_bytes,
        })
    }
}

// Ed25519 keys take precedence over the shared secret.
fn jwt_keys_from<F>(lookup: &F) -> Result<JwtKeys, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(public_pem) = non_empty(lookup("ACCESS_JWT_PUBLIC_KEY_PEM")) {
        let private_pem = non_empty(lookup("ACCESS_JWT_PRIVATE_KEY_PEM")).map(|pem| unescape_pem(&pem));
        return Ok(JwtKeys::Ed25519 {
            public_pem: unescape_pem(&public_pem),
            private_pem,
        });
    }

    match lookup("JWT_SECRET") {
        Some(secret) if secret.is_empty() => Err(ConfigError::Invalid("JWT_SECRET")),
        Some(secret) => Ok(JwtKeys::Hmac {
            secret: secret.into_bytes(),
        }),
        None => Err(ConfigError::Missing("JWT_SECRET")),
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match non_empty(lookup(key)) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// .env files usually carry PEM blocks on one line with literal `\n`.
fn unescape_pem(pem: &str) -> String {
    pem.replace("\\n", "\n")
}
