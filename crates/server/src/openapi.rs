use axum::Json;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Nested identity document of a user.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonalIdDocumentDoc {
    /// 5 to 20 characters.
    pub document_id: Option<String>,
    /// ISO 3166-1 alpha-2, e.g. `US`.
    pub country_of_issue: Option<String>,
    /// `YYYY-MM-DD`.
    pub valid_until: Option<String>,
}

/// User record as accepted and returned by `/users`. Unknown fields are kept.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    pub id: String,
    /// 2 to 50 characters.
    pub first_name: String,
    /// 2 to 50 characters.
    pub last_name: String,
    pub email: Option<String>,
    /// `YYYY-MM-DD`.
    pub date_of_birth: String,
    pub personal_id_document: PersonalIdDocumentDoc,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::create_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
    ),
    components(
        schemas(
            HealthResponse,
            UserDoc,
            PersonalIdDocumentDoc,
            crate::errors::ProblemDetails,
            crate::errors::ValidationErrors,
        )
    ),
    tags(
        (name = "health"),
        (name = "users", description = "User resource backed by a JSON file"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
