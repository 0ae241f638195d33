// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile edit route for the authenticated user.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::FieldUpdate;
use crate::response::ApiResponse;
use crate::services::user_fields::{sanitize_user_edit, UserEditRequest};
use crate::AppState;
use axum::{extract::State, routing::put, Extension, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/users", put(edit_user))
}

async fn edit_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UserEditRequest>,
) -> Result<ApiResponse<FieldUpdate>> {
    let update = sanitize_user_edit(user.user_id, &request)?;

    tracing::info!(user_id = user.user_id, field = %update.name, "Editing user profile");

    state.store.apply_field_mutation(&update).await?;
    Ok(ApiResponse::ok(update))
}
