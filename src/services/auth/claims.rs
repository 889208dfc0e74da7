use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Access token (JWT) claims as issued for admin users.
///
/// NOTE:
/// - `sub` is the numeric user id, `roleId` stays camelCase on the wire for the web client.
/// - Registered claims we do not model (`iss`, `aud`, `jti`, `nbf`, ...) and any custom
///   claim land in `extra`; `iss`/`aud` are still enforced by `Validation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: i64,
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "roleId", default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,

    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
