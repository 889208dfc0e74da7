//! Route guard: route visibility → bearer 検証 → Identity を extensions に入れる
//!
//! - public route (handler/controller の tag で解決) は検証せずに通す。Identity は入れない
//! - それ以外は `Authorization: Bearer <jwt>` を検証し、失敗したら 401 で打ち切る
//!   - expired / invalid token / authentication failed の 3 分類だけを返す
//! - 判断ごとに 1 行ログを出す (bypass/成功: info, 拒否: warn)

use axum::{
    Router,
    body::Body,
    extract::{MatchedPath, State},
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use tracing::{info, warn};

use crate::api::v1::extractors::Identity;
use crate::error::{AppError, AuthFailure};
use crate::middleware::auth::visibility::Visibility;
use crate::services::auth::{InvalidReason, Verification};
use crate::state::AppState;

/// Router 全体に route guard を掛ける。
///
/// `route_layer` なので、どの route にもマッチしないリクエストは guard を通らず 404 になる。
///
/// 例：
/// ```ignore
/// let router = Router::new().nest("/api/v1", api::v1::routes());
/// let router = middleware::auth::guard::apply(router, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, guard))
}

async fn guard(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // route template (`/api/v1/users/{id}`) で引く。無ければ生の path
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    if state.routes.resolve(req.method(), &route) == Visibility::Public {
        info!(method = %req.method(), route = %route, "public route, authentication skipped");
        return Ok(next.run(req).await);
    }

    let Some(token) = bearer_token(req.headers()) else {
        return Err(reject(&route, AuthFailure::AuthenticationFailed, "missing bearer credential"));
    };

    let identity = match state.verifier.verify(token).await {
        Verification::Valid(claims) => Identity::from(claims),
        Verification::Expired => {
            return Err(reject(&route, AuthFailure::Expired, "credential expired"));
        }
        Verification::Invalid(InvalidReason::Malformed(reason)) => {
            return Err(reject(&route, AuthFailure::InvalidToken, &reason));
        }
        Verification::Invalid(InvalidReason::Rejected(reason)) => {
            return Err(reject(&route, AuthFailure::AuthenticationFailed, &reason));
        }
    };

    info!(
        route = %route,
        user_id = identity.id,
        username = %identity.username,
        "request authenticated"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

fn reject(route: &str, failure: AuthFailure, reason: &str) -> AppError {
    warn!(
        route = %route,
        category = failure.code(),
        reason = %reason,
        "authentication rejected"
    );
    AppError::Unauthorized(failure)
}

/// `Authorization: Bearer <token>` の token 部分。scheme は大文字小文字を区別しない。
/// ヘッダ無し・別 scheme・空 token は「credential 無し」として None
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
