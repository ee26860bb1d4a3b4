//! Service provider handlers.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{PathParam, ValidatedJson};
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::schedule::{parse_date, parse_time};
use crate::domain::{Availability, NewProvider, ProviderChanges, ServiceProvider, SlotWindow};
use crate::errors::AppResult;
use crate::services::ProviderRegistration;
use crate::types::Created;

/// One availability slot as sent by clients
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SlotInput {
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

impl SlotInput {
    pub fn window(&self) -> AppResult<SlotWindow> {
        SlotWindow::new(
            parse_date("available_date", &self.available_date)?,
            parse_time("start_time", &self.start_time)?,
            parse_time("end_time", &self.end_time)?,
        )
    }
}

fn windows(slots: &[SlotInput]) -> AppResult<Vec<SlotWindow>> {
    slots.iter().map(SlotInput::window).collect()
}

/// Admin provider creation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProviderRequest {
    #[validate(length(min = 1, message = "service_type is required"))]
    #[schema(example = "haircut")]
    pub service_type: String,
    #[validate(length(min = 1, message = "location is required"))]
    #[schema(example = "Berlin")]
    pub location: String,
    #[validate(length(min = 1, message = "contact_number is required"))]
    #[schema(example = "+49 30 1234567")]
    pub contact_number: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// Owning user account
    #[serde(alias = "userId")]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub availability: Vec<SlotInput>,
}

/// Provider self-registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterProviderRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "salon-anna")]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "anna@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "service_type is required"))]
    pub service_type: String,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "contact_number is required"))]
    pub contact_number: String,
    #[serde(default)]
    pub availability: Vec<SlotInput>,
}

/// Partial provider update; `availability`, when present, replaces every slot
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProviderRequest {
    #[validate(length(min = 1, message = "service_type must not be empty"))]
    pub service_type: Option<String>,
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: Option<String>,
    #[validate(length(min = 1, message = "contact_number must not be empty"))]
    pub contact_number: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub availability: Option<Vec<SlotInput>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterProviderResponse {
    pub provider: ServiceProvider,
    /// JWT for the newly created owning account
    pub token: String,
}

/// Provider routes; reads and self-registration are public
pub fn provider_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register_provider))
        .route("/:id", get(get_provider))
        .route("/:id/availability", get(get_availability));

    let protected = Router::new()
        .route("/", post(create_provider))
        .route("/:id", axum::routing::put(update_provider))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}

/// Create a provider with initial availability (admin only)
#[utoipa::path(
    post,
    path = "/providers",
    tag = "Providers",
    request_body = CreateProviderRequest,
    responses(
        (status = 201, description = "Provider created", body = ServiceProvider),
        (status = 400, description = "Validation error, overlapping slots or email taken"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_provider(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateProviderRequest>,
) -> AppResult<Created<ServiceProvider>> {
    let slots = windows(&payload.availability)?;
    let provider = NewProvider {
        user_id: payload.user_id,
        email: payload.email,
        service_type: payload.service_type,
        location: payload.location,
        contact_number: payload.contact_number,
    };

    let provider = state
        .provider_service
        .create_provider(&actor, provider, slots)
        .await?;
    Ok(Created(provider))
}

/// Register as a provider (creates the owning account)
#[utoipa::path(
    post,
    path = "/providers/register",
    tag = "Providers",
    request_body = RegisterProviderRequest,
    responses(
        (status = 201, description = "Provider registered", body = RegisterProviderResponse),
        (status = 400, description = "Validation error, overlapping slots or email taken")
    )
)]
pub async fn register_provider(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterProviderRequest>,
) -> AppResult<Created<RegisterProviderResponse>> {
    let slots = windows(&payload.availability)?;
    let registration = ProviderRegistration {
        username: payload.username,
        email: payload.email,
        password: payload.password,
        service_type: payload.service_type,
        location: payload.location,
        contact_number: payload.contact_number,
        slots,
    };

    let session = state.provider_service.register_provider(registration).await?;
    Ok(Created(RegisterProviderResponse {
        provider: session.provider,
        token: session.token,
    }))
}

/// Get a provider
#[utoipa::path(
    get,
    path = "/providers/{id}",
    tag = "Providers",
    params(("id" = Uuid, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Provider found", body = ServiceProvider),
        (status = 404, description = "Provider not found")
    )
)]
pub async fn get_provider(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<ServiceProvider>> {
    let provider = state.provider_service.get_provider(id).await?;
    Ok(Json(provider))
}

/// Update a provider (owner or admin)
#[utoipa::path(
    put,
    path = "/providers/{id}",
    tag = "Providers",
    params(("id" = Uuid, Path, description = "Provider ID")),
    request_body = UpdateProviderRequest,
    responses(
        (status = 200, description = "Provider updated", body = ServiceProvider),
        (status = 400, description = "Validation error, overlapping slots or email taken"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Provider not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_provider(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    PathParam(id): PathParam<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProviderRequest>,
) -> AppResult<Json<ServiceProvider>> {
    let slots = payload.availability.as_deref().map(windows).transpose()?;
    let changes = ProviderChanges {
        email: payload.email,
        service_type: payload.service_type,
        location: payload.location,
        contact_number: payload.contact_number,
    };

    let provider = state
        .provider_service
        .update_provider(&actor, id, changes, slots)
        .await?;
    Ok(Json(provider))
}

/// List a provider's availability slots
#[utoipa::path(
    get,
    path = "/providers/{id}/availability",
    tag = "Providers",
    params(("id" = Uuid, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Slots in insertion order", body = [Availability]),
        (status = 404, description = "Provider not found")
    )
)]
pub async fn get_availability(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Vec<Availability>>> {
    let slots = state.provider_service.get_availability(id).await?;
    Ok(Json(slots))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_input_accepts_short_times() {
        let input = SlotInput {
            available_date: "2024-06-01".into(),
            start_time: "09:00".into(),
            end_time: "12:30:00".into(),
        };
        let window = input.window().unwrap();
        assert_eq!(window.start_time.to_string(), "09:00:00");
        assert_eq!(window.end_time.to_string(), "12:30:00");
    }

    #[test]
    fn test_slot_input_rejects_garbage() {
        let input = SlotInput {
            available_date: "June first".into(),
            start_time: "09:00".into(),
            end_time: "12:00".into(),
        };
        assert!(input.window().is_err());
    }
}
