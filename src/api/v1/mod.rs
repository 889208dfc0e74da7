/*
 * Responsibility
 * - v1 の公開ポイント (routes() / route_table() の re-export など)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::{BASE_PATH, route_table, routes};
