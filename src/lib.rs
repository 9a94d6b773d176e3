pub mod config;
pub mod controllers;
pub mod error;
pub mod layers;
pub mod models;
pub mod openapi;
pub mod services;
pub mod state;
pub mod validation;

use axum::routing::get;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

pub use layers::init_tracing;
pub use state::AppState;

use openapi::OpenApiConfig;

/// Assemble the full HTTP service: user routes at the root, the liveness and
/// documentation endpoints, and the standard middleware stack.
///
/// The result is wrapped in trailing-slash normalization, which only takes
/// effect before routing when the wrapped service itself is served; see
/// `main` for the `ServiceExt::into_make_service` call this requires.
pub fn app(state: AppState) -> NormalizePath<Router> {
    let docs = OpenApiConfig::new("Users API", env!("CARGO_PKG_VERSION"))
        .with_description("Minimal user directory: create, read, update and delete users")
        .with_docs_ui(true);

    let router = Router::new()
        .merge(controllers::user_controller::router())
        .merge(openapi::openapi_routes(docs, &openapi::route_metadata()))
        .route("/health", get(liveness))
        .layer(layers::default_cors())
        .layer(layers::default_trace())
        .layer(layers::catch_panic_layer())
        .with_state(state);

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

async fn liveness() -> &'static str {
    "OK"
}
