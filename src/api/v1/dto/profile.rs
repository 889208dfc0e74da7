/*
 * Responsibility
 * - /secure/profile の response DTO
 * - web client に合わせて camelCase で返す
 */
use serde::Serialize;

use crate::api::v1::extractors::Identity;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub role_id: Option<i64>,
}

impl From<Identity> for ProfileResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username,
            email: identity.email,
            role_id: identity.role_id,
        }
    }
}
