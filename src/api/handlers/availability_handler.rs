//! Availability slot handlers (all require authentication).

use axum::{
    extract::State,
    response::Json,
    routing::{post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{PathParam, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::schedule::{parse_date, parse_time};
use crate::domain::{Availability, SlotWindow};
use crate::errors::AppResult;
use crate::services::SlotPatch;
use crate::types::{Created, NoContent};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSlotRequest {
    #[serde(alias = "providerId")]
    pub provider_id: Uuid,
    #[serde(alias = "availableDate")]
    #[schema(example = "2024-06-01")]
    pub available_date: String,
    #[serde(alias = "startTime")]
    #[schema(example = "09:00")]
    pub start_time: String,
    #[serde(alias = "endTime")]
    #[schema(example = "12:00")]
    pub end_time: String,
}

/// Partial slot update; absent parts keep their stored value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSlotRequest {
    #[serde(alias = "availableDate")]
    pub available_date: Option<String>,
    #[serde(alias = "startTime")]
    pub start_time: Option<String>,
    #[serde(alias = "endTime")]
    pub end_time: Option<String>,
}

impl UpdateSlotRequest {
    fn patch(&self) -> AppResult<SlotPatch> {
        Ok(SlotPatch {
            available_date: self
                .available_date
                .as_deref()
                .map(|v| parse_date("available_date", v))
                .transpose()?,
            start_time: self
                .start_time
                .as_deref()
                .map(|v| parse_time("start_time", v))
                .transpose()?,
            end_time: self
                .end_time
                .as_deref()
                .map(|v| parse_time("end_time", v))
                .transpose()?,
        })
    }
}

pub fn availability_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_slot))
        .route("/:id", put(update_slot).delete(delete_slot))
}

/// Add a slot to a provider (owner or admin)
#[utoipa::path(
    post,
    path = "/availability",
    tag = "Availability",
    request_body = CreateSlotRequest,
    responses(
        (status = 201, description = "Slot created", body = Availability),
        (status = 400, description = "Invalid or overlapping slot"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Provider not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_slot(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateSlotRequest>,
) -> AppResult<Created<Availability>> {
    let window = SlotWindow::new(
        parse_date("available_date", &payload.available_date)?,
        parse_time("start_time", &payload.start_time)?,
        parse_time("end_time", &payload.end_time)?,
    )?;

    let slot = state
        .provider_service
        .create_slot(&actor, payload.provider_id, window)
        .await?;
    Ok(Created(slot))
}

/// Change a slot (owner or admin)
#[utoipa::path(
    put,
    path = "/availability/{id}",
    tag = "Availability",
    params(("id" = Uuid, Path, description = "Slot ID")),
    request_body = UpdateSlotRequest,
    responses(
        (status = 200, description = "Slot updated", body = Availability),
        (status = 400, description = "Invalid or overlapping slot"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Slot not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_slot(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    PathParam(id): PathParam<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSlotRequest>,
) -> AppResult<Json<Availability>> {
    let patch = payload.patch()?;
    let slot = state.provider_service.update_slot(&actor, id, patch).await?;
    Ok(Json(slot))
}

/// Remove a slot (owner or admin)
#[utoipa::path(
    delete,
    path = "/availability/{id}",
    tag = "Availability",
    params(("id" = Uuid, Path, description = "Slot ID")),
    responses(
        (status = 204, description = "Slot deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Slot not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_slot(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<NoContent> {
    state.provider_service.delete_slot(&actor, id).await?;
    Ok(NoContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_parses_only_present_fields() {
        let request = UpdateSlotRequest {
            available_date: None,
            start_time: Some("10:15".into()),
            end_time: None,
        };
        let patch = request.patch().unwrap();
        assert!(patch.available_date.is_none());
        assert_eq!(patch.start_time.unwrap().to_string(), "10:15:00");
        assert!(patch.end_time.is_none());
    }

    #[test]
    fn test_patch_rejects_bad_time() {
        let request = UpdateSlotRequest {
            available_date: None,
            start_time: None,
            end_time: Some("25:99".into()),
        };
        assert!(request.patch().is_err());
    }
}
