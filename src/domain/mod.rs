//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod availability;
pub mod booking;
pub mod notification;
pub mod password;
pub mod policy;
pub mod provider;
pub mod schedule;
pub mod user;

pub use availability::{Availability, SlotWindow};
pub use booking::{Booking, BookingStatus, NewBooking};
pub use notification::{DeliveryStatus, Notification};
pub use password::Password;
pub use policy::{Action, Identity, Resource};
pub use provider::{NewProvider, ProviderChanges, ServiceProvider};
pub use user::{User, UserChanges, UserResponse, UserRole};
