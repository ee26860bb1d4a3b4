//! Unit of Work pattern implementation.
//!
//! Centralizes access to the repositories and owns the transaction lifecycle
//! (begin, commit, rollback) for workflows that touch several tables at once:
//! provider registration, availability replacement and booking creation.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    availability_repository, booking_repository, provider_repository, user_repository,
    AvailabilityRepository, AvailabilityStore, BookingRepository, BookingStore,
    NotificationRepository, NotificationStore, ProviderRepository, ProviderStore, UserRepository,
    UserStore,
};
use crate::domain::{
    Availability, Booking, BookingStatus, NewBooking, NewProvider, ProviderChanges,
    ServiceProvider, SlotWindow, User, UserChanges, UserRole,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock at the repository level or use integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn providers(&self) -> Arc<dyn ProviderRepository>;

    fn availability(&self) -> Arc<dyn AvailabilityRepository>;

    fn bookings(&self) -> Arc<dyn BookingRepository>;

    fn notifications(&self) -> Arc<dyn NotificationRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    /// Uses ReadCommitted isolation.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;

    /// Execute a closure within a serializable transaction.
    ///
    /// Used where a read decides whether a write may happen (double booking).
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    pub fn providers(&self) -> TxProviderRepository<'_> {
        TxProviderRepository { txn: self.txn }
    }

    pub fn availability(&self) -> TxAvailabilityRepository<'_> {
        TxAvailabilityRepository { txn: self.txn }
    }

    pub fn bookings(&self) -> TxBookingRepository<'_> {
        TxBookingRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    provider_repo: Arc<ProviderStore>,
    availability_repo: Arc<AvailabilityStore>,
    booking_repo: Arc<BookingStore>,
    notification_repo: Arc<NotificationStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            provider_repo: Arc::new(ProviderStore::new(db.clone())),
            availability_repo: Arc::new(AvailabilityStore::new(db.clone())),
            booking_repo: Arc::new(BookingStore::new(db.clone())),
            notification_repo: Arc::new(NotificationStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn providers(&self) -> Arc<dyn ProviderRepository> {
        self.provider_repo.clone()
    }

    fn availability(&self) -> Arc<dyn AvailabilityRepository> {
        self.availability_repo.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.booking_repo.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.notification_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxUserRepository<'_> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        user_repository::find_by_id(self.txn, id).await
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        user_repository::find_by_email(self.txn, email).await
    }

    pub async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
        role: UserRole,
    ) -> AppResult<User> {
        user_repository::create(self.txn, username, email, password_hash, role).await
    }

    pub async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        user_repository::update(self.txn, id, changes).await
    }
}

/// Transaction-aware provider repository.
pub struct TxProviderRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxProviderRepository<'_> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ServiceProvider>> {
        provider_repository::find_by_id(self.txn, id).await
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<ServiceProvider>> {
        provider_repository::find_by_email(self.txn, email).await
    }

    pub async fn create(&self, provider: NewProvider) -> AppResult<ServiceProvider> {
        provider_repository::create(self.txn, provider).await
    }

    pub async fn update(&self, id: Uuid, changes: ProviderChanges) -> AppResult<ServiceProvider> {
        provider_repository::update(self.txn, id, changes).await
    }
}

/// Transaction-aware availability repository.
pub struct TxAvailabilityRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxAvailabilityRepository<'_> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Availability>> {
        availability_repository::find_by_id(self.txn, id).await
    }

    pub async fn list_for_provider(&self, provider_id: Uuid) -> AppResult<Vec<Availability>> {
        availability_repository::list_for_provider(self.txn, provider_id).await
    }

    pub async fn list_for_provider_on(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<Availability>> {
        availability_repository::list_for_provider_on(self.txn, provider_id, date).await
    }

    pub async fn create(&self, provider_id: Uuid, window: SlotWindow) -> AppResult<Availability> {
        availability_repository::create(self.txn, provider_id, window).await
    }

    /// Insert `windows` in order, returning the stored slots.
    pub async fn create_many(
        &self,
        provider_id: Uuid,
        windows: &[SlotWindow],
    ) -> AppResult<Vec<Availability>> {
        let mut slots = Vec::with_capacity(windows.len());
        for window in windows {
            slots.push(availability_repository::create(self.txn, provider_id, *window).await?);
        }
        Ok(slots)
    }

    pub async fn update(&self, id: Uuid, window: SlotWindow) -> AppResult<Availability> {
        availability_repository::update(self.txn, id, window).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        availability_repository::delete(self.txn, id).await
    }

    pub async fn delete_for_provider(&self, provider_id: Uuid) -> AppResult<u64> {
        availability_repository::delete_for_provider(self.txn, provider_id).await
    }
}

/// Transaction-aware booking repository.
pub struct TxBookingRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxBookingRepository<'_> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        booking_repository::find_by_id(self.txn, id).await
    }

    pub async fn find_confirmed_at(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<Option<Booking>> {
        booking_repository::find_confirmed_at(self.txn, provider_id, date, time).await
    }

    pub async fn create(&self, booking: NewBooking) -> AppResult<Booking> {
        booking_repository::create(self.txn, booking).await
    }

    pub async fn update_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking> {
        booking_repository::update_status(self.txn, id, status).await
    }
}

/// Shorthand for running a block inside `UnitOfWork::transaction`.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
