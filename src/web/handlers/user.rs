//! User handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::user::{User, UserDirectory};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /api/RegisterUser - Register a user.
///
/// The body is a JSON `User`; the content type is not checked.
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<Value>, ApiError> {
    let user: User = serde_json::from_str(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid user: {e}")))?;

    UserDirectory::new(&state.storage).register(user).await?;

    Ok(Json(json!({})))
}

/// GET /api/user/:email - Get a user by email.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    UserDirectory::new(&state.storage)
        .lookup(&email)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// GET /api/users - List users ordered by email.
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    let users = UserDirectory::new(&state.storage).list().await?;
    Ok(Json(users))
}
