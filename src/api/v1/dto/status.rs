use serde::Serialize;

/// Body of the unauthenticated probes (`/health`, `/public/ping`, `/secure/status`).
///
/// `authenticated` reports whether the guard attached an identity, which on a
/// public route is always `false`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub authenticated: bool,
}
