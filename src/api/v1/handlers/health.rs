/*
 * Responsibility
 * - GET /health (疎通用)
 * - handler 単位で public に tag されている (controller を持たない)
 */
use axum::Json;

use crate::api::v1::dto::status::StatusResponse;

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        authenticated: false,
    })
}
