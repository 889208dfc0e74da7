/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - routes: route visibility table (起動時に固定、読み取り専用)
 *   - verifier: credential verifier
 * - Clone 前提で持つ (内部は Arc)
 * - 可変な共有状態は持たない (リクエスト間でロック不要)
 */
use std::sync::Arc;

use crate::middleware::auth::RouteTable;
use crate::services::auth::CredentialVerifier;

#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn new(routes: Arc<RouteTable>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { routes, verifier }
    }
}
