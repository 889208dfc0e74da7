/*
 * Responsibility
 * - Config 読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (route guard / CORS / HTTP 横断)
 * - axum::serve() で起動、Ctrl-C で graceful shutdown
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::auth::{KeyError, build_verifier};
use crate::state::AppState;
use crate::{api, middleware};

/// Used when RUST_LOG is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,admin_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {} ({:?} tokens)",
        config.app_env,
        config.addr,
        config.jwt_keys.algorithm()
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState, KeyError> {
    let verifier = build_verifier(config)?;
    let routes = Arc::new(api::v1::route_table());

    Ok(AppState::new(routes, verifier))
}

/// API routes behind the route guard, without the transport layers.
pub fn router(state: AppState) -> Router {
    let router = Router::new().nest(api::v1::BASE_PATH, api::v1::routes());
    middleware::auth::guard::apply(router, state.clone()).with_state(state)
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = router(state);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        // Never resolve: without a signal handler the server just keeps running.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
