//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod availability;
pub mod booking;
pub mod notification;
pub mod service_provider;
pub mod user;
