//! Service Container - Centralized service access.
//!
//! Builds every service over one shared `Persistence` and hands them out
//! as trait objects, so handlers depend on service traits only.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, BookingManager, BookingService, NotificationService, Notifier,
    ProviderManager, ProviderService, TokenIssuer, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{EmailDispatcher, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn providers(&self) -> Arc<dyn ProviderService>;

    fn bookings(&self) -> Arc<dyn BookingService>;

    fn notifications(&self) -> Arc<dyn NotificationService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    provider_service: Arc<dyn ProviderService>,
    booking_service: Arc<dyn BookingService>,
    notification_service: Arc<dyn NotificationService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        provider_service: Arc<dyn ProviderService>,
        booking_service: Arc<dyn BookingService>,
        notification_service: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            provider_service,
            booking_service,
            notification_service,
        }
    }

    /// Wire all services from a database connection, config and mail channel.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: &Config,
        dispatcher: Arc<dyn EmailDispatcher>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let tokens = Arc::new(TokenIssuer::new(config));

        let notification_service: Arc<dyn NotificationService> = Arc::new(Notifier::new(
            uow.clone(),
            dispatcher,
            config.smtp.timeout,
        ));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), tokens.clone())),
            user_service: Arc::new(UserManager::new(uow.clone())),
            provider_service: Arc::new(ProviderManager::new(uow.clone(), tokens)),
            booking_service: Arc::new(BookingManager::new(uow, notification_service.clone())),
            notification_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn providers(&self) -> Arc<dyn ProviderService> {
        self.provider_service.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingService> {
        self.booking_service.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationService> {
        self.notification_service.clone()
    }
}
