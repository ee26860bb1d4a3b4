//! Booking handlers.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{PathParam, ValidatedJson};
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::schedule::{parse_date, parse_time};
use crate::domain::Booking;
use crate::errors::AppResult;
use crate::services::BookingRequest;
use crate::types::Created;

/// Booking request; `user_id` defaults to the caller (admins may book for others)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[serde(alias = "providerId")]
    pub provider_id: Uuid,
    #[serde(alias = "bookingDate")]
    #[schema(example = "2024-06-01")]
    pub booking_date: String,
    #[serde(alias = "bookingTime")]
    #[schema(example = "10:00")]
    pub booking_time: String,
    #[serde(alias = "userId")]
    pub user_id: Option<Uuid>,
}

impl CreateBookingRequest {
    fn parse(&self) -> AppResult<BookingRequest> {
        Ok(BookingRequest {
            user_id: self.user_id,
            provider_id: self.provider_id,
            booking_date: parse_date("booking_date", &self.booking_date)?,
            booking_time: parse_time("booking_time", &self.booking_time)?,
        })
    }
}

/// Booking routes; single bookings and provider listings are public
pub fn booking_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/:id", get(get_booking))
        .route("/provider/:id", get(list_provider_bookings));

    let protected = Router::new()
        .route("/", post(create_booking))
        .route("/:id/cancel", put(cancel_booking))
        .route("/user/:id", get(list_user_bookings))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}

/// Book a provider at a date and time
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking confirmed", body = Booking),
        (status = 400, description = "Outside availability or already booked"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Booking for another user"),
        (status = 404, description = "User or provider not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateBookingRequest>,
) -> AppResult<Created<Booking>> {
    let request = payload.parse()?;
    let booking = state.booking_service.create_booking(&actor, request).await?;
    Ok(Created(booking))
}

/// Get a booking
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking found", body = Booking),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Booking>> {
    let booking = state.booking_service.get_booking(id).await?;
    Ok(Json(booking))
}

/// Cancel a booking (its user, the provider's owner, or an admin)
#[utoipa::path(
    put,
    path = "/bookings/{id}/cancel",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Booking not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Booking>> {
    let booking = state.booking_service.cancel_booking(&actor, id).await?;
    Ok(Json(booking))
}

/// List a user's bookings (self or admin)
#[utoipa::path(
    get,
    path = "/bookings/user/{id}",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Bookings, oldest first", body = [Booking]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_user_bookings(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.booking_service.list_by_user(&actor, id).await?;
    Ok(Json(bookings))
}

/// List a provider's bookings
#[utoipa::path(
    get,
    path = "/bookings/provider/{id}",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Bookings, oldest first", body = [Booking])
    )
)]
pub async fn list_provider_bookings(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.booking_service.list_by_provider(id).await?;
    Ok(Json(bookings))
}
