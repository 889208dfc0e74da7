/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: route guard / route visibility
 * - cors, http: transport 層の横断的関心事
 */
pub mod auth;
pub mod cors;
pub mod http;
