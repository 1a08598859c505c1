//! Demo data handler.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::seed::{parse_seed, populate, SeedSummary};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /api/InitRandom - Fill storage with random users and messages.
///
/// The body is an optional decimal seed; a random one is used when blank.
pub async fn init_random(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<SeedSummary>, ApiError> {
    let seed = parse_seed(&body)?.unwrap_or_else(rand::random);
    let summary = populate(&state.storage, seed).await?;
    Ok(Json(summary))
}
