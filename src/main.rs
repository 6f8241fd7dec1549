use crate::config::WikiConfig;
use crate::error::WikiError;
use crate::features::pages::route::PathRouter;
use crate::io::{FilePageStore, PageStore};
use crate::render::TemplateSet;
use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use http::Uri;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub mod config;
mod domain;
mod error;
mod features;
mod io;
mod render;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PageStore>,
    pub templates: Arc<TemplateSet>,
    pub paths: Arc<PathRouter>,
    pub config: Arc<WikiConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wiki_server=info,tower_http=info")),
        )
        .init();

    let config = WikiConfig::from_env();
    let app = build_app(config.clone())?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Unable to bind {}", config.bind_addr))?;
    tracing::info!("server listening on: http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Builds every shared piece of state up front and wires the routes.
/// Template problems surface here, before anything is served.
pub fn build_app(config: WikiConfig) -> anyhow::Result<Router> {
    let templates = TemplateSet::load(&config.views_dir).context("Unable to load templates")?;
    let paths = PathRouter::new().context("Unable to compile page path pattern")?;
    let store = FilePageStore::new(config.pages_dir.clone());

    tracing::info!(templates = ?templates.files(), "loaded templates");
    tracing::info!(pages_dir = %config.pages_dir.display(), "serving pages");

    Ok(app(AppState {
        store: Arc::new(store),
        templates: Arc::new(templates),
        paths: Arc::new(paths),
        config: Arc::new(config),
    }))
}

pub fn app(state: AppState) -> Router {
    let body_limit = match state.config.max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .merge(features::pages::pages_router())
        .fallback(not_found)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> WikiError {
    WikiError::InvalidPath(uri.path().to_string())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
