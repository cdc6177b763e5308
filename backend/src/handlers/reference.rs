//! HTTP handlers for reference-table administration

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::AppState;

#[derive(Serialize)]
pub struct ReloadResponse {
    pub version: String,
    pub crops: usize,
    pub fertilizers: usize,
    pub regions: usize,
}

/// Reload reference tables from the configured file
pub async fn reload_reference(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let data = state.reference.reload().await?;
    Ok(Json(ReloadResponse {
        version: data.version.clone(),
        crops: data.crops.len(),
        fertilizers: data.fertilizers.len(),
        regions: data.regions.len(),
    }))
}
