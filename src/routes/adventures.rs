// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Adventure routes: field edits, path edits, deletion, completion and todo.

use crate::error::{FieldError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::mutation::id_from_value;
use crate::models::{Adventure, CompletionRecord, EncodedAverage, FieldUpdate, TodoRecord};
use crate::response::ApiResponse;
use crate::services::completion::{CompleteAdventureRequest, CompletionAverager};
use crate::services::field_sanitizer::{clear_path, sanitize_all, sanitize_path_edit};
use crate::services::field_validator::{
    validate_edit_request, validate_path_edit, EditRequest, RawPathEdit,
};
use crate::routes::require_query;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

/// Routes reachable without a token.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/adventures/details", get(get_adventure_details))
}

/// Routes behind the auth gate (applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/adventures", put(edit_adventure).delete(delete_adventure))
        .route("/adventures/path", put(edit_path).delete(delete_path))
        .route("/adventures/complete", post(complete_adventure))
        .route("/adventures/todo", post(create_todo))
}

/// Apply updates one at a time. A failure leaves earlier updates in place.
async fn apply_in_order(state: &AppState, updates: &[FieldUpdate]) -> Result<()> {
    for update in updates {
        state.store.apply_field_mutation(update).await?;
    }
    Ok(())
}

// ─── Details ─────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
struct DetailsQuery {
    #[serde(default)]
    #[validate(length(min = 1))]
    id: String,
}

async fn get_adventure_details(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DetailsQuery>,
) -> Result<ApiResponse<Adventure>> {
    require_query(&query)?;

    let adventure = state.store.get_adventure(&query.id).await?.ok_or_else(|| {
        crate::error::AppError::NotFound(format!("Adventure {} not found", query.id))
    })?;

    Ok(ApiResponse::ok(adventure))
}

// ─── Field Edits ─────────────────────────────────────────────

async fn edit_adventure(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<EditRequest>,
) -> Result<ApiResponse<Vec<FieldUpdate>>> {
    let mutations = validate_edit_request(&request)?;
    let updates = sanitize_all(&mutations);

    tracing::info!(
        user_id = user.user_id,
        fields = mutations.len(),
        updates = updates.len(),
        "Editing adventure fields"
    );

    apply_in_order(&state, &updates).await?;
    Ok(ApiResponse::ok(updates))
}

#[derive(Debug, Default, Deserialize)]
struct PathEditRequest {
    #[serde(default)]
    field: Option<RawPathEdit>,
}

async fn edit_path(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PathEditRequest>,
) -> Result<ApiResponse<Vec<FieldUpdate>>> {
    let raw = request.field.ok_or_else(|| {
        FieldError::MissingRequiredFields(
            "field object containing path, elevations, adventure_id, and adventure_type"
                .to_string(),
        )
    })?;
    let edit = validate_path_edit(&raw)?;
    let updates = sanitize_path_edit(&edit);

    tracing::info!(adventure_id = %edit.adventure_id, "Editing adventure path");

    apply_in_order(&state, &updates).await?;
    Ok(ApiResponse::ok(updates))
}

/// `?adventure_id=&adventure_type=` for deletes.
#[derive(Debug, Deserialize, Validate)]
struct AdventureQuery {
    #[serde(default)]
    #[validate(length(min = 1))]
    adventure_id: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    adventure_type: String,
}

async fn delete_path(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdventureQuery>,
) -> Result<StatusCode> {
    require_query(&query)?;

    tracing::info!(adventure_id = %query.adventure_id, "Clearing adventure path");

    let update = clear_path(&query.adventure_id, &query.adventure_type);
    state.store.apply_field_mutation(&update).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_adventure(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<AdventureQuery>,
) -> Result<StatusCode> {
    require_query(&query)?;

    tracing::info!(
        user_id = user.user_id,
        adventure_id = %query.adventure_id,
        adventure_type = %query.adventure_type,
        "Deleting adventure"
    );

    state.store.delete_adventure(&query.adventure_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Completion ──────────────────────────────────────────────

/// Averages stored on the adventure after a completion.
#[derive(Debug, Serialize)]
pub struct AdventureCompletedField {
    pub adventure_id: String,
    pub rating: EncodedAverage,
    pub difficulty: EncodedAverage,
}

#[derive(Debug, Serialize)]
pub struct CompletedBody {
    pub user_completed_field: CompletionRecord,
    pub adventure_completed_field: AdventureCompletedField,
}

#[derive(Debug, Serialize)]
pub struct CompletedResponse {
    pub completed: CompletedBody,
}

async fn complete_adventure(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CompleteAdventureRequest>,
) -> Result<ApiResponse<CompletedResponse>> {
    let event = request.into_event()?;

    tracing::info!(
        user_id = user.user_id,
        adventure_id = %event.adventure_id,
        adventure_type = %event.adventure_type,
        "Completing adventure"
    );

    let outcome = CompletionAverager::new(state.store.as_ref())
        .complete_adventure(&event)
        .await?;

    let record = CompletionRecord {
        user_id: user.user_id,
        adventure_id: event.adventure_id.clone(),
        adventure_type: event.adventure_type.clone(),
        public: event.public,
        rating: event.user_rating,
        difficulty: event.user_difficulty,
        completed_at: chrono::Utc::now().to_rfc3339(),
    };
    state.store.record_completion(&record).await?;

    Ok(ApiResponse::created(CompletedResponse {
        completed: CompletedBody {
            user_completed_field: record,
            adventure_completed_field: AdventureCompletedField {
                adventure_id: event.adventure_id,
                rating: outcome.new_rating,
                difficulty: outcome.new_difficulty,
            },
        },
    }))
}

// ─── Todo ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct TodoRequest {
    #[serde(default)]
    adventure_id: Option<Value>,
    #[serde(default)]
    public: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct AdventureTodoField {
    pub adventure_id: String,
    pub user_id: u64,
}

#[derive(Debug, Serialize)]
pub struct TodoBody {
    pub user_todo_field: TodoRecord,
    pub adventure_todo_field: AdventureTodoField,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub todo: TodoBody,
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<TodoRequest>,
) -> Result<ApiResponse<TodoResponse>> {
    let adventure_id = request
        .adventure_id
        .as_ref()
        .and_then(id_from_value)
        .ok_or_else(|| FieldError::MissingRequiredFields("adventure_id".to_string()))?;
    let public = request
        .public
        .ok_or_else(|| FieldError::MissingRequiredFields("public".to_string()))?;

    if state.store.get_adventure(&adventure_id).await?.is_none() {
        return Err(crate::error::AppError::NotFound(format!(
            "Adventure {} not found",
            adventure_id
        )));
    }

    tracing::info!(user_id = user.user_id, adventure_id = %adventure_id, "Marking adventure todo");

    let record = TodoRecord {
        user_id: user.user_id,
        adventure_id: adventure_id.clone(),
        public,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    state.store.record_todo(&record).await?;

    Ok(ApiResponse::created(TodoResponse {
        todo: TodoBody {
            user_todo_field: record,
            adventure_todo_field: AdventureTodoField {
                adventure_id,
                user_id: user.user_id,
            },
        },
    }))
}
