// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Zone routes: creation, details and field edits.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FieldUpdate, Zone};
use crate::response::ApiResponse;
use crate::services::zone_fields::{
    sanitize_zone_edit, validate_new_zone, validate_zone_edit, CreateZoneRequest, ZoneEditRequest,
};
use crate::routes::require_query;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/zones", post(create_zone).put(edit_zone))
        .route("/zones/details", get(get_zone_details))
}

#[derive(Debug, Serialize)]
pub struct ZoneResponse {
    pub zone: Zone,
}

async fn create_zone(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateZoneRequest>,
) -> Result<ApiResponse<ZoneResponse>> {
    let new_zone = validate_new_zone(&request)?;
    let zone = new_zone.into_zone(uuid::Uuid::new_v4().to_string(), user.user_id);

    tracing::info!(
        user_id = user.user_id,
        zone_id = %zone.id,
        adventure_type = %zone.adventure_type,
        "Creating zone"
    );

    state.store.put_zone(&zone).await?;
    Ok(ApiResponse::created(ZoneResponse { zone }))
}

#[derive(Debug, Deserialize, Validate)]
struct ZoneQuery {
    #[serde(default)]
    #[validate(length(min = 1))]
    zone_id: String,
}

async fn get_zone_details(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ZoneQuery>,
) -> Result<ApiResponse<ZoneResponse>> {
    require_query(&query)?;

    let zone = state
        .store
        .get_zone(&query.zone_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Zone {} not found", query.zone_id)))?;

    Ok(ApiResponse::ok(ZoneResponse { zone }))
}

async fn edit_zone(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<ZoneEditRequest>,
) -> Result<ApiResponse<Vec<FieldUpdate>>> {
    let mutation = validate_zone_edit(&request)?;
    let updates = sanitize_zone_edit(&mutation)?;

    tracing::info!(
        user_id = user.user_id,
        zone_id = %mutation.zone_id,
        field = %mutation.field_name,
        "Editing zone"
    );

    for update in &updates {
        state.store.apply_field_mutation(update).await?;
    }

    Ok(ApiResponse::ok(updates))
}
