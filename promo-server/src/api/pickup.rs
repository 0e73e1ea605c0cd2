//! Pickup configuration routes
//!
//! The storefront widget reads the config publicly; the admin surface
//! replaces it. A degraded read (settings store unreachable) still
//! answers 200 with the default config plus a warning field.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use shared::models::shipping::PickupConfig;

use crate::core::AppState;
use crate::utils::{AppError, AppResponse, ok};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/pickup-config", get(get_config).put(put_config))
}

#[derive(Serialize)]
pub struct PickupConfigResponse {
    #[serde(flatten)]
    pub config: PickupConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

pub async fn get_config(State(state): State<AppState>) -> Json<PickupConfigResponse> {
    let (config, degraded) = state.pickup.load().await;
    Json(PickupConfigResponse {
        config,
        warning: degraded.then(|| "Stored configuration unavailable, defaults in effect".to_string()),
    })
}

pub async fn put_config(
    State(state): State<AppState>,
    Json(config): Json<PickupConfig>,
) -> Result<Json<AppResponse<PickupConfig>>, AppError> {
    state.pickup.save(&config).await?;
    Ok(ok(config))
}
