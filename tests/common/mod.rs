#![allow(dead_code)]

use admin_api::{
    app,
    config::Config,
    services::auth::{JwtIssuer, Subject, build_issuer},
};
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";
pub const ISSUER: &str = "admin-api";
pub const AUDIENCE: &str = "admin-web";

/// テスト用の設定 (HS256 + iss/aud 検証あり)
pub fn config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        "AUTH_ISSUER" => Some(ISSUER.to_string()),
        "AUTH_AUDIENCE" => Some(AUDIENCE.to_string()),
        _ => None,
    })
    .unwrap()
}

/// guard 付きの API router (transport 層なし)
pub fn app() -> Router {
    let config = config();
    app::router(app::build_state(&config).unwrap())
}

/// CORS / request-id / timeout まで含めた本番相当の router
pub fn full_app() -> Router {
    let config = config();
    app::build_router(app::build_state(&config).unwrap(), &config)
}

pub fn issuer() -> JwtIssuer {
    build_issuer(&config()).unwrap()
}

pub fn alice() -> Subject {
    Subject {
        user_id: 1,
        username: "alice".to_string(),
        email: Some("alice@example.com".to_string()),
        role_id: Some(2),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn get(app: Router, path: &str, authorization: Option<&str>) -> TestResponse {
    let mut request = Request::builder().uri(path);
    if let Some(value) = authorization {
        request = request.header(header::AUTHORIZATION, value);
    }

    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
