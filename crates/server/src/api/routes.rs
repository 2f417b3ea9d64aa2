use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{cart, handlers, session};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Sessions
        .route("/session", post(session::create_session))
        // Cart
        .route("/cart", get(cart::get_cart).delete(cart::clear_cart))
        .route("/cart/items", get(cart::get_items))
        .route("/cart/checkout", post(cart::checkout))
        .route("/cart/movies/{id}/toggle", post(cart::toggle_movie))
        .route(
            "/cart/shows/{show_id}/episodes",
            get(cart::get_show_episodes).put(cart::sync_show_episodes),
        )
        .route(
            "/cart/shows/{show_id}/episodes/{code}/toggle",
            post(cart::toggle_episode),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
}
