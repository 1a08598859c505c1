//! Mail handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::mail::{parse_message, Message, MessageStore};
use crate::user::UserDirectory;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /api/Send - Send a message given as raw text.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<Value>, ApiError> {
    let message = parse_message(&body)?;
    MessageStore::new(&state.storage).append(message).await?;

    Ok(Json(json!({})))
}

/// GET /api/messages - List all messages in the order they were sent.
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = MessageStore::new(&state.storage).list().await?;
    Ok(Json(messages))
}

async fn require_user(state: &AppState, email: &str) -> Result<(), ApiError> {
    if UserDirectory::new(&state.storage).exists(email).await? {
        Ok(())
    } else {
        Err(ApiError::not_found("User not found"))
    }
}

/// GET /api/user/:email/inbox - Messages received by a user.
pub async fn user_inbox(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    require_user(&state, &email).await?;
    let messages = MessageStore::new(&state.storage).inbox(&email).await?;
    Ok(Json(messages))
}

/// GET /api/user/:email/sent - Messages sent by a user.
pub async fn user_sent(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    require_user(&state, &email).await?;
    let messages = MessageStore::new(&state.storage).sent(&email).await?;
    Ok(Json(messages))
}
