//! Service provider repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use super::entities::service_provider::{self, ActiveModel, Entity as ProviderEntity};
use crate::domain::{NewProvider, ProviderChanges, ServiceProvider};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// Find provider by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ServiceProvider>>;

    /// Find provider by contact email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<ServiceProvider>>;
}

pub struct ProviderStore {
    db: DatabaseConnection,
}

impl ProviderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProviderRepository for ProviderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ServiceProvider>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<ServiceProvider>> {
        find_by_email(&self.db, email).await
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> AppResult<Option<ServiceProvider>> {
    let result = ProviderEntity::find_by_id(id).one(db).await?;
    Ok(result.map(ServiceProvider::from))
}

pub(crate) async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> AppResult<Option<ServiceProvider>> {
    let result = ProviderEntity::find()
        .filter(service_provider::Column::Email.eq(email))
        .one(db)
        .await?;
    Ok(result.map(ServiceProvider::from))
}

pub(crate) async fn create<C: ConnectionTrait>(
    db: &C,
    provider: NewProvider,
) -> AppResult<ServiceProvider> {
    let now = Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(provider.user_id),
        email: Set(provider.email),
        service_type: Set(provider.service_type),
        location: Set(provider.location),
        contact_number: Set(provider.contact_number),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model
        .insert(db)
        .await
        .map_err(|e| AppError::from_write(e, "Email"))?;
    Ok(ServiceProvider::from(model))
}

pub(crate) async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    changes: ProviderChanges,
) -> AppResult<ServiceProvider> {
    let provider = ProviderEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = provider.into();

    if let Some(email) = changes.email {
        active.email = Set(Some(email));
    }
    if let Some(service_type) = changes.service_type {
        active.service_type = Set(service_type);
    }
    if let Some(location) = changes.location {
        active.location = Set(location);
    }
    if let Some(contact_number) = changes.contact_number {
        active.contact_number = Set(contact_number);
    }
    active.updated_at = Set(Utc::now());

    let model = active
        .update(db)
        .await
        .map_err(|e| AppError::from_write(e, "Email"))?;
    Ok(ServiceProvider::from(model))
}
