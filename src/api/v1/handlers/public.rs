/*
 * Responsibility
 * - /public 配下 (controller ごと public) の handler
 * - credential を送ってきても guard は検証しないので Identity は無い
 */
use axum::Json;

use crate::api::v1::{dto::status::StatusResponse, extractors::CurrentUser};

pub async fn ping(user: Option<CurrentUser>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "pong",
        authenticated: user.is_some(),
    })
}
