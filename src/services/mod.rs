//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and apply the access policy before touching data.

mod auth_service;
mod booking_service;
pub mod container;
mod notification_service;
mod provider_service;
mod token_service;
mod user_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, AuthSession, Authenticator};
pub use booking_service::{BookingManager, BookingRequest, BookingService};
pub use notification_service::{NotificationService, Notifier};
pub use provider_service::{
    ProviderManager, ProviderRegistration, ProviderService, ProviderSession, SlotPatch,
};
pub use token_service::{Claims, TokenIssuer};
pub use user_service::{UserManager, UserService, UserUpdate};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_service::MockNotificationService;

#[cfg(test)]
pub(crate) mod test_support;
