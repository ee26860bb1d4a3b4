//! User handlers.

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{PathParam, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::is_valid_role;
use crate::domain::{UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::services::UserUpdate;

/// Update user request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    #[schema(example = "jdoe")]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "new@example.com")]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    /// Admin only
    #[schema(example = "admin")]
    pub role: Option<String>,
}

/// User routes (all require authentication)
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/:id", get(get_user).put(update_user))
}

/// Get a user by ID (self or admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(&actor, id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update a user (self or admin; role changes admin only)
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error or email taken"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    PathParam(id): PathParam<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let role = match payload.role {
        Some(role) if is_valid_role(&role) => Some(UserRole::from(role.as_str())),
        Some(role) => return Err(AppError::validation(format!("Invalid role: {}", role))),
        None => None,
    };

    let update = UserUpdate {
        username: payload.username,
        email: payload.email,
        password: payload.password,
        role,
    };

    let user = state.user_service.update_user(&actor, id, update).await?;
    Ok(Json(UserResponse::from(user)))
}
