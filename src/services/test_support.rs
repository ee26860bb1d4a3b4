//! Unit-of-work double and fixtures for service tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{DeliveryStatus, Notification, ServiceProvider, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    AvailabilityRepository, BookingRepository, MockAvailabilityRepository, MockBookingRepository,
    MockNotificationRepository, MockProviderRepository, MockUserRepository,
    NotificationRepository, ProviderRepository, TransactionContext, UnitOfWork, UserRepository,
};

pub(crate) fn test_user(id: Uuid) -> User {
    User {
        id,
        username: "tester".to_string(),
        email: "test@example.com".to_string(),
        password_hash: "hashed".to_string(),
        role: UserRole::User,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub(crate) fn test_provider(id: Uuid, owner: Option<Uuid>) -> ServiceProvider {
    ServiceProvider {
        id,
        user_id: owner,
        email: None,
        service_type: "haircut".to_string(),
        location: "Berlin".to_string(),
        contact_number: "123".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub(crate) fn test_notification(
    user_id: Uuid,
    subject: String,
    message: String,
    delivery_status: DeliveryStatus,
) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        user_id,
        subject,
        message,
        delivery_status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// UnitOfWork over mock repositories. Transactions are not supported;
/// transactional paths are covered by the end-to-end tests.
pub(crate) struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    providers: Arc<MockProviderRepository>,
    availability: Arc<MockAvailabilityRepository>,
    bookings: Arc<MockBookingRepository>,
    notifications: Arc<MockNotificationRepository>,
}

impl TestUnitOfWork {
    pub(crate) fn builder() -> TestUnitOfWorkBuilder {
        TestUnitOfWorkBuilder::default()
    }
}

#[derive(Default)]
pub(crate) struct TestUnitOfWorkBuilder {
    users: Option<MockUserRepository>,
    providers: Option<MockProviderRepository>,
    availability: Option<MockAvailabilityRepository>,
    bookings: Option<MockBookingRepository>,
    notifications: Option<MockNotificationRepository>,
}

impl TestUnitOfWorkBuilder {
    pub(crate) fn users(mut self, repo: MockUserRepository) -> Self {
        self.users = Some(repo);
        self
    }

    pub(crate) fn providers(mut self, repo: MockProviderRepository) -> Self {
        self.providers = Some(repo);
        self
    }

    pub(crate) fn availability(mut self, repo: MockAvailabilityRepository) -> Self {
        self.availability = Some(repo);
        self
    }

    pub(crate) fn bookings(mut self, repo: MockBookingRepository) -> Self {
        self.bookings = Some(repo);
        self
    }

    pub(crate) fn notifications(mut self, repo: MockNotificationRepository) -> Self {
        self.notifications = Some(repo);
        self
    }

    pub(crate) fn build(self) -> TestUnitOfWork {
        TestUnitOfWork {
            users: Arc::new(self.users.unwrap_or_default()),
            providers: Arc::new(self.providers.unwrap_or_default()),
            availability: Arc::new(self.availability.unwrap_or_default()),
            bookings: Arc::new(self.bookings.unwrap_or_default()),
            notifications: Arc::new(self.notifications.unwrap_or_default()),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn providers(&self) -> Arc<dyn ProviderRepository> {
        self.providers.clone()
    }

    fn availability(&self) -> Arc<dyn AvailabilityRepository> {
        self.availability.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.bookings.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.notifications.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
