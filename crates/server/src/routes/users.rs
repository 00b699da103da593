use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use models::UserRecord;
use serde_json::Value;
use tracing::info;

use crate::errors::ApiError;
use crate::startup::ServerState;

/// A body sent without a JSON content type is not parsed and carries no fields.
fn record_from_body(body: Result<Json<Value>, JsonRejection>) -> Result<UserRecord, JsonRejection> {
    match body {
        Ok(Json(body)) => Ok(UserRecord::from_value(body)),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(UserRecord::default()),
        Err(rejection) => Err(rejection),
    }
}

#[utoipa::path(
    get, path = "/users", tag = "users",
    responses((status = 200, description = "All users", body = [crate::openapi::UserDoc]))
)]
pub async fn list_users(State(state): State<ServerState>) -> Json<Vec<UserRecord>> {
    Json(state.users.list().await)
}

#[utoipa::path(
    get, path = "/users/{id}", tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::UserDoc),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    let user = state.users.get(&id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post, path = "/users", tag = "users",
    request_body = crate::openapi::UserDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::UserDoc),
        (status = 400, description = "Invalid Input", body = crate::errors::ProblemDetails),
        (status = 409, description = "Duplicate id (when rejected by configuration)", body = crate::errors::ProblemDetails),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn create_user(
    State(state): State<ServerState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<UserRecord>), ApiError> {
    let candidate = record_from_body(body).map_err(ApiError::from_rejection)?;
    let created = state.users.create(candidate).await?;
    info!(user_id = created.id().unwrap_or_default(), "POST /users created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/users/{id}", tag = "users",
    params(("id" = String, Path, description = "User id")),
    request_body = crate::openapi::UserDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UserDoc),
        (status = 400, description = "Validation errors", body = crate::errors::ValidationErrors),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn update_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UserRecord>, ApiError> {
    let patch = match record_from_body(body) {
        Ok(patch) => patch,
        Err(rejection) => {
            // An unknown id is reported as such whatever the body looks like.
            state.users.get(&id).await?;
            return Err(ApiError::from_rejection(rejection));
        }
    };
    let updated = state.users.update(&id, patch).await.map_err(ApiError::for_update)?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/users/{id}", tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn delete_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
