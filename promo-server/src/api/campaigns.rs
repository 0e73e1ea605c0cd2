//! Campaign catalog admin routes
//!
//! The admin UI reads and replaces the catalog as one document; the
//! server always answers with the normalized, priority-sorted form.

use axum::{Json, Router, extract::State, routing::get};
use serde_json::Value;
use shared::models::campaign::Campaign;

use crate::core::AppState;
use crate::utils::{AppError, AppResponse, ok};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/campaigns", get(list_campaigns).put(replace_campaigns))
}

pub async fn list_campaigns(State(state): State<AppState>) -> Json<AppResponse<Vec<Campaign>>> {
    ok(state.campaigns.load().await)
}

pub async fn replace_campaigns(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Result<Json<AppResponse<Vec<Campaign>>>, AppError> {
    let campaigns = state.campaigns.save(&raw).await?;
    Ok(ok(campaigns))
}
