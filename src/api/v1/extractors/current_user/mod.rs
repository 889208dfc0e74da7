/*!
 * Authenticated identity extractor
 *
 * Responsibility:
 * - route guard が検証済みの Identity を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - Identity
 * - CurrentUser
 */

mod core;
mod types;

pub use core::CurrentUser;
pub use types::Identity;
