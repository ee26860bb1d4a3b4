//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{dispatcher_from_settings, Database, EmailDispatcher};
use crate::services::{
    AuthService, BookingService, NotificationService, ProviderService, ServiceContainer,
    Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub provider_service: Arc<dyn ProviderService>,
    pub booking_service: Arc<dyn BookingService>,
    pub notification_service: Arc<dyn NotificationService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from the database and config, choosing the
    /// mail channel from the SMTP settings.
    pub fn from_config(database: Arc<Database>, config: &Config) -> AppResult<Self> {
        let dispatcher = dispatcher_from_settings(&config.smtp)?;
        Ok(Self::with_dispatcher(database, config, dispatcher))
    }

    /// Create application state with an explicit mail channel.
    pub fn with_dispatcher(
        database: Arc<Database>,
        config: &Config,
        dispatcher: Arc<dyn EmailDispatcher>,
    ) -> Self {
        let container = Services::from_connection(database.get_connection(), config, dispatcher);
        Self::from_container(database, &container)
    }

    /// Create application state from any service container.
    pub fn from_container(database: Arc<Database>, container: &dyn ServiceContainer) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            provider_service: container.providers(),
            booking_service: container.bookings(),
            notification_service: container.notifications(),
            database,
        }
    }
}
