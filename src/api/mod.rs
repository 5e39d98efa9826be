mod handlers;
mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use state::{AppState, SessionStore, UpdateError};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/sessions/{id}", delete(handlers::delete_session))
        .route("/sessions/{id}/divine", post(handlers::divine))
        .route("/sessions/{id}/reset", post(handlers::reset_session))
        .route("/sessions/{id}/scroll", get(handlers::get_scroll))
        // Zodiac
        .route("/zodiac/{year}", get(handlers::get_zodiac))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
