//! Router configuration for the HTTP API.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    get_user, init_random, list_messages, list_users, register_user, send_message, user_inbox,
    user_sent, AppState,
};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let user_routes = Router::new()
        .route("/RegisterUser", post(register_user))
        .route("/users", get(list_users))
        .route("/user/:email", get(get_user))
        .route("/user/:email/inbox", get(user_inbox))
        .route("/user/:email/sent", get(user_sent));

    let mail_routes = Router::new()
        .route("/Send", post(send_message))
        .route("/messages", get(list_messages));

    let api_routes = Router::new()
        .merge(user_routes)
        .merge(mail_routes)
        .route("/InitRandom", post(init_random));

    Router::new()
        .nest("/api", api_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
