//! Repository layer - Data access abstraction
//!
//! Each repository exposes a trait for the read paths services use outside a
//! transaction, a concrete store over the connection pool, and crate-private
//! query functions generic over `ConnectionTrait` so the transactional
//! repositories in `unit_of_work` run the very same SQL.

pub(crate) mod availability_repository;
pub(crate) mod booking_repository;
pub(crate) mod entities;
pub(crate) mod notification_repository;
pub(crate) mod provider_repository;
pub(crate) mod user_repository;

pub use availability_repository::{AvailabilityRepository, AvailabilityStore};
pub use booking_repository::{BookingRepository, BookingStore};
pub use notification_repository::{NotificationRepository, NotificationStore};
pub use provider_repository::{ProviderRepository, ProviderStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use availability_repository::MockAvailabilityRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use booking_repository::MockBookingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_repository::MockNotificationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use provider_repository::MockProviderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
