//! Notification handlers (all require authentication).

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{PathParam, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Notification;
use crate::errors::AppResult;
use crate::types::Created;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendNotificationRequest {
    #[serde(alias = "userId")]
    pub user_id: Uuid,
    /// Defaults to a generic subject
    pub subject: Option<String>,
    #[validate(length(min = 1, message = "message is required"))]
    #[schema(example = "Your appointment has moved to 11:00.")]
    pub message: String,
}

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/send", post(send_notification))
        .route("/:id", get(list_notifications))
}

/// Notifications addressed to a user (self or admin)
#[utoipa::path(
    get,
    path = "/notifications/{id}",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Notifications, oldest first", body = [Notification]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state.notification_service.list_for_user(&actor, id).await?;
    Ok(Json(notifications))
}

/// Record and email a notification to a user
#[utoipa::path(
    post,
    path = "/notifications/send",
    tag = "Notifications",
    request_body = SendNotificationRequest,
    responses(
        (status = 201, description = "Notification recorded; see delivery_status", body = Notification),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn send_notification(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<SendNotificationRequest>,
) -> AppResult<Created<Notification>> {
    let notification = state
        .notification_service
        .send(&actor, payload.user_id, payload.subject, payload.message)
        .await?;
    Ok(Created(notification))
}
