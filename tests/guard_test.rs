//! Route guard 統合テスト
//!
//! `app::router` (guard + v1 routes) を `oneshot` で叩く。
//! token は本物の `JwtIssuer` で発行し、verifier の分岐を見たいテストではスタブを使う。
//!
//! ## テストケース
//!
//! - public route は credential の有無・中身に関係なく通り、Identity は付かない
//! - protected route に credential 無し → 401 authentication failed
//! - 期限切れ token → 401 expired (他と区別できる)
//! - 壊れた token → 401 invalid token
//! - 署名/issuer/audience 違い・nbf 前 → 401 authentication failed
//! - 有効な token → handler が Identity (username = alice) を受け取る
//! - handler 単位の public tag は protected controller の中でも効く
//! - 拒否時は handler が実行されない

mod common;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use admin_api::{
    api::v1::extractors::CurrentUser,
    app,
    middleware::auth::{RouteTable, Visibility},
    services::auth::{
        AccessClaims, CredentialVerifier, InvalidReason, JwtIssuer, JwtKeys, Verification,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    Json, Router,
    http::{Method, StatusCode, header},
    routing::get as route_get,
};
use chrono::Utc;
use common::{AUDIENCE, ISSUER, alice, bearer, get};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Map, json};

fn assert_rejected(response: &common::TestResponse, code: &str, message: &str) {
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers.get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    assert_eq!(
        response.body,
        json!({"error": {"code": code, "message": message}})
    );
}

// --- demo routes over the real verifier ---

#[tokio::test]
async fn public_ping_without_credential_runs_without_identity() {
    let response = get(common::app(), "/api/v1/public/ping", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"status": "pong", "authenticated": false})
    );
}

#[rstest]
#[case::valid_token(true)]
#[case::garbage_token(false)]
#[tokio::test]
async fn public_ping_ignores_presented_credential(#[case] valid: bool) {
    let token = if valid {
        common::issuer().issue(&alice()).unwrap()
    } else {
        "garbage".to_string()
    };

    let response = get(common::app(), "/api/v1/public/ping", Some(&bearer(&token))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["authenticated"], json!(false));
}

#[tokio::test]
async fn health_is_public() {
    let response = get(common::app(), "/api/v1/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"status": "ok", "authenticated": false}));
}

#[tokio::test]
async fn profile_without_credential_is_generic_failure() {
    let response = get(common::app(), "/api/v1/secure/profile", None).await;

    assert_rejected(&response, "AUTHENTICATION_FAILED", "authentication failed");
}

#[tokio::test]
async fn profile_with_other_scheme_is_generic_failure() {
    let response = get(
        common::app(),
        "/api/v1/secure/profile",
        Some("Basic YWxpY2U6c2VjcmV0"),
    )
    .await;

    assert_rejected(&response, "AUTHENTICATION_FAILED", "authentication failed");
}

#[tokio::test]
async fn profile_with_expired_token_asks_to_sign_in_again() {
    let token = common::issuer()
        .issue_at(&alice(), Utc::now().timestamp() - 2 * 86_400)
        .unwrap();

    let response = get(common::app(), "/api/v1/secure/profile", Some(&bearer(&token))).await;

    assert_rejected(
        &response,
        "TOKEN_EXPIRED",
        "login expired, please sign in again",
    );
}

#[rstest]
#[case::not_a_jwt("not-a-jwt")]
#[case::bad_base64("a.b.c")]
#[case::two_segments("header.payload")]
#[tokio::test]
async fn profile_with_malformed_token_is_invalid_token(#[case] token: &str) {
    let response = get(common::app(), "/api/v1/secure/profile", Some(&bearer(token))).await;

    assert_rejected(&response, "INVALID_TOKEN", "invalid token");
}

#[tokio::test]
async fn profile_with_foreign_signature_is_generic_failure() {
    let foreign = JwtIssuer::new(
        &JwtKeys::Hmac {
            secret: b"someone-elses-secret".to_vec(),
        },
        Some(ISSUER.to_string()),
        Some(AUDIENCE.to_string()),
        3600,
    )
    .unwrap();
    let token = foreign.issue(&alice()).unwrap();

    let response = get(common::app(), "/api/v1/secure/profile", Some(&bearer(&token))).await;

    assert_rejected(&response, "AUTHENTICATION_FAILED", "authentication failed");
}

#[tokio::test]
async fn profile_with_token_not_yet_valid_is_generic_failure() {
    let now = Utc::now().timestamp();
    let token = common::issuer()
        .sign(&json!({
            "sub": 1,
            "username": "alice",
            "iss": ISSUER,
            "aud": AUDIENCE,
            "exp": now + 7200,
            "nbf": now + 3600,
        }))
        .unwrap();

    let response = get(common::app(), "/api/v1/secure/profile", Some(&bearer(&token))).await;

    assert_rejected(&response, "AUTHENTICATION_FAILED", "authentication failed");
}

#[tokio::test]
async fn profile_with_wrong_audience_is_generic_failure() {
    let other_audience = JwtIssuer::new(
        &JwtKeys::Hmac {
            secret: common::SECRET.as_bytes().to_vec(),
        },
        Some(ISSUER.to_string()),
        Some("mobile-app".to_string()),
        3600,
    )
    .unwrap();
    let token = other_audience.issue(&alice()).unwrap();

    let response = get(common::app(), "/api/v1/secure/profile", Some(&bearer(&token))).await;

    assert_rejected(&response, "AUTHENTICATION_FAILED", "authentication failed");
}

#[tokio::test]
async fn profile_with_valid_token_sees_alice() {
    let token = common::issuer().issue(&alice()).unwrap();

    let response = get(common::app(), "/api/v1/secure/profile", Some(&bearer(&token))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "id": 1,
            "username": "alice",
            "email": "alice@example.com",
            "roleId": 2
        })
    );
}

#[tokio::test]
async fn handler_level_public_overrides_protected_controller() {
    let response = get(common::app(), "/api/v1/secure/status", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"status": "ok", "authenticated": false}));
}

#[tokio::test]
async fn unknown_route_is_not_found_rather_than_unauthorized() {
    let response = get(common::app(), "/api/v1/secure/nowhere", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_stack_tags_rejections_with_request_id() {
    let response = get(common::full_app(), "/api/v1/secure/profile", None).await;

    assert_rejected(&response, "AUTHENTICATION_FAILED", "authentication failed");
    assert!(response.headers.contains_key("x-request-id"));
}

// --- guard decisions over a stub verifier ---

/// 固定の結果を返し、呼ばれた回数を数える verifier
struct StubVerifier {
    outcome: Verification,
    calls: AtomicUsize,
}

impl StubVerifier {
    fn new(outcome: Verification) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialVerifier for StubVerifier {
    async fn verify(&self, _token: &str) -> Verification {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

fn claims_for(username: &str) -> AccessClaims {
    AccessClaims {
        sub: 5,
        username: username.to_string(),
        email: None,
        role_id: None,
        exp: Utc::now().timestamp() + 3600,
        iat: None,
        extra: Map::new(),
    }
}

/// `/admin` controller (protected) の中に public handler を 1 つ持つ router。
/// handler が実行された回数も返す。
fn stub_app(verifier: Arc<StubVerifier>) -> (Router, Arc<AtomicUsize>) {
    let executed = Arc::new(AtomicUsize::new(0));

    let routes = RouteTable::builder()
        .controller("/admin", Visibility::Protected)
        .handler(Method::GET, "/admin/ping", Visibility::Public)
        .build();
    let state = AppState::new(Arc::new(routes), verifier);

    let hits = executed.clone();
    let whoami = move |user: Option<CurrentUser>| {
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            Json(json!({"username": user.map(|CurrentUser(identity)| identity.username)}))
        }
    };

    let router = Router::new()
        .route("/admin/whoami", route_get(whoami.clone()))
        .route("/admin/ping", route_get(whoami))
        .route("/users/{id}", route_get(|| async { "untagged" }));
    let router = admin_api::middleware::auth::guard::apply(router, state.clone()).with_state(state);

    (router, executed)
}

#[rstest]
#[case::expired(Verification::Expired, "TOKEN_EXPIRED", "login expired, please sign in again")]
#[case::malformed(
    Verification::Invalid(InvalidReason::Malformed("bad segments".into())),
    "INVALID_TOKEN",
    "invalid token"
)]
#[case::rejected(
    Verification::Invalid(InvalidReason::Rejected("InvalidIssuer".into())),
    "AUTHENTICATION_FAILED",
    "authentication failed"
)]
#[tokio::test]
async fn rejection_stops_before_the_handler(
    #[case] outcome: Verification,
    #[case] code: &str,
    #[case] message: &str,
) {
    let verifier = StubVerifier::new(outcome);
    let (router, executed) = stub_app(verifier.clone());

    let response = get(router, "/admin/whoami", Some("Bearer whatever")).await;

    assert_rejected(&response, code, message);
    assert_eq!(verifier.calls(), 1);
    assert_eq!(executed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_outcome_attaches_identity() {
    let verifier = StubVerifier::new(Verification::Valid(claims_for("bob")));
    let (router, executed) = stub_app(verifier.clone());

    let response = get(router, "/admin/whoami", Some("Bearer whatever")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"username": "bob"}));
    assert_eq!(executed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn public_handler_never_consults_the_verifier() {
    let verifier = StubVerifier::new(Verification::Valid(claims_for("bob")));
    let (router, executed) = stub_app(verifier.clone());

    let response = get(router, "/admin/ping", Some("Bearer whatever")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"username": null}));
    assert_eq!(verifier.calls(), 0);
    assert_eq!(executed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_credential_never_consults_the_verifier() {
    let verifier = StubVerifier::new(Verification::Valid(claims_for("bob")));
    let (router, executed) = stub_app(verifier.clone());

    let response = get(router, "/admin/whoami", None).await;

    assert_rejected(&response, "AUTHENTICATION_FAILED", "authentication failed");
    assert_eq!(verifier.calls(), 0);
    assert_eq!(executed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn untagged_route_with_path_params_requires_authentication() {
    let verifier = StubVerifier::new(Verification::Expired);
    let (router, _) = stub_app(verifier.clone());

    let anonymous = get(router.clone(), "/users/42", None).await;
    let expired = get(router, "/users/42", Some("Bearer whatever")).await;

    assert_rejected(&anonymous, "AUTHENTICATION_FAILED", "authentication failed");
    assert_rejected(
        &expired,
        "TOKEN_EXPIRED",
        "login expired, please sign in again",
    );
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let token = common::issuer().issue(&alice()).unwrap();
    let app = common::app();

    let authorization = bearer(&token);
    let authed = get(app.clone(), "/api/v1/secure/profile", Some(&authorization));
    let anonymous = get(app.clone(), "/api/v1/secure/profile", None);
    let public = get(app, "/api/v1/public/ping", None);

    let (authed, anonymous, public) = tokio::join!(authed, anonymous, public);

    assert_eq!(authed.status, StatusCode::OK);
    assert_eq!(authed.body["username"], json!("alice"));
    assert_rejected(&anonymous, "AUTHENTICATION_FAILED", "authentication failed");
    assert_eq!(public.status, StatusCode::OK);
}

#[tokio::test]
async fn build_state_wires_the_configured_verifier() {
    let state = app::build_state(&common::config()).unwrap();

    assert_eq!(
        state.routes.resolve(&Method::GET, "/api/v1/secure/profile"),
        Visibility::Protected
    );
    assert_eq!(
        state.routes.resolve(&Method::GET, "/api/v1/public/ping"),
        Visibility::Public
    );
}
