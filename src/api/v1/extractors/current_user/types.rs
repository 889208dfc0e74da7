/*
 * Responsibility
 * - Handler から見える「認証済み主体」の型
 * - route guard が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - Identity があれば id/username は必ず埋まっている (username は空文字にならない)
 * - Identity が無いリクエストは public route を通ってきたもの
 */
use serde_json::{Map, Value};

use crate::services::auth::AccessClaims;

/// 認証済みのリクエストに付与される主体
///
/// - `id` は内部ユーザーID (JWT `sub`)
/// - `role_id` は coarse-grained な権限情報 (細かい認可は handler/service 側)
/// - `extra` は名前付きフィールドに載らなかった claim (`iss`, `aud`, `jti` など)
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub role_id: Option<i64>,
    pub extra: Map<String, Value>,
}

impl Identity {
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

impl From<AccessClaims> for Identity {
    fn from(claims: AccessClaims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            email: claims.email,
            role_id: claims.role_id,
            extra: claims.extra,
        }
    }
}
