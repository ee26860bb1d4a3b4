//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Outgoing email
//! - Unit of Work for transaction management

pub mod db;
pub mod mailer;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, MigrationStatus, Migrator};
pub use mailer::{dispatcher_from_settings, EmailDispatcher, EmailMessage, LogMailer, SmtpMailer};
pub use repositories::{
    AvailabilityRepository, BookingRepository, NotificationRepository, ProviderRepository,
    UserRepository,
};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockEmailDispatcher;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAvailabilityRepository, MockBookingRepository, MockNotificationRepository,
    MockProviderRepository, MockUserRepository,
};
