use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use codescope_core::StaticConfig;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub fn create_router(state: AppState, static_files: &StaticConfig) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Code analysis
        .route("/analyze-code", post(handlers::analyze_code))
        .with_state(state);

    // Serve the prebuilt form client when configured, with its entry
    // document as the fallback for unmatched routes.
    let router = match &static_files.dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router,
    };

    router
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(TraceLayer::new_for_http())
}
