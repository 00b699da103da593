use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use service::errors::ServiceError;
use tracing::error;

pub const PROBLEM_TYPE: &str = "https://example.com/problemdetails";
pub const USERS_INSTANCE: &str = "/users";

/// Problem payload returned for rejected creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
}

impl ProblemDetails {
    pub fn new(status: StatusCode, title: &str, detail: impl Into<String>) -> Self {
        Self {
            kind: PROBLEM_TYPE.to_string(),
            title: title.to_string(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: USERS_INSTANCE.to_string(),
        }
    }

    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid Input", detail)
    }
}

/// Body returned for rejected updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ValidationErrors {
    pub errors: Vec<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Problem(ProblemDetails),
    Errors(Vec<String>),
    NotFound,
    Internal,
}

impl ApiError {
    /// Update reports field violations as a bare `{errors: [...]}` list rather
    /// than a problem payload; everything else maps as usual.
    pub fn for_update(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(violations) => ApiError::Errors(violations),
            other => other.into(),
        }
    }

    pub fn from_rejection(rejection: JsonRejection) -> Self {
        ApiError::Problem(ProblemDetails::invalid_input(rejection.body_text()))
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(violations) => {
                ApiError::Problem(ProblemDetails::invalid_input(violations.join(", ")))
            }
            ServiceError::MissingId => {
                ApiError::Problem(ProblemDetails::invalid_input(ServiceError::MissingId.to_string()))
            }
            ServiceError::Conflict(id) => ApiError::Problem(ProblemDetails::new(
                StatusCode::CONFLICT,
                "Conflict",
                format!("User with id {} already exists", id),
            )),
            ServiceError::NotFound(_) => ApiError::NotFound,
            ServiceError::Persistence(msg) => {
                error!(error = %msg, "failed to persist users");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Problem(problem) => {
                let status = StatusCode::from_u16(problem.status).unwrap_or(StatusCode::BAD_REQUEST);
                (status, Json(problem)).into_response()
            }
            ApiError::Errors(errors) => {
                (StatusCode::BAD_REQUEST, Json(ValidationErrors { errors })).into_response()
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "User not found").into_response(),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response(),
        }
    }
}
