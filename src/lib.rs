/*
 * Responsibility
 * - crate の公開モジュール一覧
 * - binary (main.rs) と tests/ から同じ Router を組み立てられるようにする
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
