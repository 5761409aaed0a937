// HTTP server setup (Axum + static assets)
pub mod app;
pub mod middleware;
pub mod routes;

pub use app::*;
