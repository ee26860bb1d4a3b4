//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, availability_handler, booking_handler, notification_handler, provider_handler,
    user_handler,
};
use crate::domain::{
    Availability, Booking, BookingStatus, DeliveryStatus, Notification, ServiceProvider,
    UserResponse, UserRole,
};
use crate::types::MessageResponse;

/// OpenAPI documentation for the booking API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Booking API",
        version = "0.1.0",
        description = "Service providers publish availability; users book it and get notified"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // User endpoints
        user_handler::get_user,
        user_handler::update_user,
        // Provider endpoints
        provider_handler::create_provider,
        provider_handler::register_provider,
        provider_handler::get_provider,
        provider_handler::update_provider,
        provider_handler::get_availability,
        // Availability endpoints
        availability_handler::create_slot,
        availability_handler::update_slot,
        availability_handler::delete_slot,
        // Booking endpoints
        booking_handler::create_booking,
        booking_handler::get_booking,
        booking_handler::cancel_booking,
        booking_handler::list_user_bookings,
        booking_handler::list_provider_bookings,
        // Notification endpoints
        notification_handler::list_notifications,
        notification_handler::send_notification,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            ServiceProvider,
            Availability,
            Booking,
            BookingStatus,
            Notification,
            DeliveryStatus,
            MessageResponse,
            // Request/response types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::RegisterResponse,
            auth_handler::LoginResponse,
            user_handler::UpdateUserRequest,
            provider_handler::SlotInput,
            provider_handler::CreateProviderRequest,
            provider_handler::RegisterProviderRequest,
            provider_handler::UpdateProviderRequest,
            provider_handler::RegisterProviderResponse,
            availability_handler::CreateSlotRequest,
            availability_handler::UpdateSlotRequest,
            booking_handler::CreateBookingRequest,
            notification_handler::SendNotificationRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "Account profile operations"),
        (name = "Providers", description = "Service provider profiles"),
        (name = "Availability", description = "Bookable availability slots"),
        (name = "Bookings", description = "Booking and cancellation"),
        (name = "Notifications", description = "User notifications and email delivery")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
