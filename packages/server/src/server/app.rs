//! Application setup and server configuration.

use std::path::PathBuf;

use axum::{extract::Extension, middleware, routing::get, Router};
use http2_pusher::{PushBuilder, ResourceHasher};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::server::middleware::{server_push, PushState};
use crate::server::routes::health_handler;

/// The directory static assets are served and hashed from
#[derive(Clone, Debug)]
pub struct PublicRoot(pub PathBuf);

/// Build the push builder for a configuration
pub fn build_push_state(config: &Config) -> PushState {
    let hasher = ResourceHasher::new(config.public_path.clone());
    let builder = PushBuilder::new(config.push.clone(), hasher);

    PushState::new(builder, config.middleware.clone(), config.manifest_file())
}

/// Build the Axum application router
///
/// Everything outside `/health` is served from the public root, with the
/// server push middleware applied to HTML responses.
pub fn build_app(config: &Config) -> Router {
    build_app_with_state(config, build_push_state(config))
}

/// Build the router around a prepared push state (e.g. one with a mock fetcher)
pub fn build_app_with_state(config: &Config, state: PushState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .fallback_service(ServeDir::new(&config.public_path))
        .layer(middleware::from_fn_with_state(state, server_push))
        .layer(Extension(PublicRoot(config.public_path.clone())))
        .layer(TraceLayer::new_for_http())
}
