//! HTTP request handlers.

pub mod auth_handler;
pub mod availability_handler;
pub mod booking_handler;
pub mod notification_handler;
pub mod provider_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use availability_handler::availability_routes;
pub use booking_handler::booking_routes;
pub use notification_handler::notification_routes;
pub use provider_handler::provider_routes;
pub use user_handler::user_routes;
