use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};

use crate::error::ApiError;
use crate::models::{User, UserFilter, UserPayload};
use crate::state::AppState;
use crate::validation::{self, Validated};

/// Routes for the user resource.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user))
        .route("/update-users/{id}", put(update_user))
        .route("/delete-users/{id}", delete(delete_user))
}

async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.list(filter.name.as_deref()).await?;
    Ok(Json(users))
}

async fn create_user(
    State(state): State<AppState>,
    Validated(payload): Validated<UserPayload>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let (name, email) = payload.into_parts();
    let user = state.users.create(name, email).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let user = state.users.get(id).await?;
    Ok(Json(user))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    // An unknown id is a 404 even when the payload is broken, so the record
    // is resolved before the body is looked at.
    state.users.get(id).await?;

    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(detail = %rejection.body_text(), "rejected unparsable request body");
        ApiError::BadRequest("Invalid request body".into())
    })?;
    validation::check(&payload)?;

    let (name, email) = payload.into_parts();
    let user = state.users.update(id, name, email).await?;
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let removed = state.users.delete(id).await?;
    let body = serde_json::json!({
        "message": format!("{removed} user was deleted successfully!"),
    });
    Ok((StatusCode::NO_CONTENT, Json(body)))
}
