/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 同じ場所で route visibility (public/protected) も宣言する
 *   - controller: path prefix 単位の tag
 *   - handler: (method, path) 単位の tag。controller より優先
 *   - 何も tag しなければ認証必須
 */
use axum::{Router, http::Method, routing::get};

use crate::api::v1::handlers::{health::health, public, secure};
use crate::middleware::auth::{RouteTable, Visibility};
use crate::state::AppState;

/// `routes()` is nested under this prefix; the visibility table uses full paths.
pub const BASE_PATH: &str = "/api/v1";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/public/ping", get(public::ping))
        .route("/secure/profile", get(secure::profile))
        .route("/secure/status", get(secure::status))
}

pub fn route_table() -> RouteTable {
    RouteTable::builder()
        .controller(&format!("{BASE_PATH}/public"), Visibility::Public)
        .controller(&format!("{BASE_PATH}/secure"), Visibility::Protected)
        .handler(Method::GET, &format!("{BASE_PATH}/health"), Visibility::Public)
        .handler(
            Method::GET,
            &format!("{BASE_PATH}/secure/status"),
            Visibility::Public,
        )
        .build()
}
