pub mod routes;
pub mod ws;

use crate::state::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;

/// HTTP + WS surface over the shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/estimate", post(routes::post_estimate))
        .route("/api/presets", get(routes::get_presets))
        .route("/api/presets/{ticker}", get(routes::get_preset))
        .route("/api/presets/{ticker}/apply", post(routes::apply_preset))
        .route("/api/inputs", put(routes::put_inputs))
        .route("/api/state", get(routes::get_state))
        .route("/api/counters", get(routes::get_counters))
        .route("/ws", get(ws::ws_handler))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(state)
}
