/*
 * Responsibility
 * - /secure 配下 (controller は protected) の handler
 * - /secure/status だけは handler 単位の public tag で controller の tag を上書きしている
 */
use axum::Json;

use crate::api::v1::{
    dto::{profile::ProfileResponse, status::StatusResponse},
    extractors::CurrentUser,
};

pub async fn profile(CurrentUser(identity): CurrentUser) -> Json<ProfileResponse> {
    tracing::debug!(user_id = identity.id, "profile requested");
    Json(ProfileResponse::from(identity))
}

pub async fn status(user: Option<CurrentUser>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        authenticated: user.is_some(),
    })
}
