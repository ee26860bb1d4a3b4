//! Availability slot repository.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::availability::{self, ActiveModel, Entity as AvailabilityEntity};
use crate::domain::{Availability, SlotWindow};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Find a slot by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Availability>>;

    /// All slots of a provider, in insertion order
    async fn list_for_provider(&self, provider_id: Uuid) -> AppResult<Vec<Availability>>;
}

pub struct AvailabilityStore {
    db: DatabaseConnection,
}

impl AvailabilityStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AvailabilityRepository for AvailabilityStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Availability>> {
        find_by_id(&self.db, id).await
    }

    async fn list_for_provider(&self, provider_id: Uuid) -> AppResult<Vec<Availability>> {
        list_for_provider(&self.db, provider_id).await
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> AppResult<Option<Availability>> {
    let result = AvailabilityEntity::find_by_id(id).one(db).await?;
    Ok(result.map(Availability::from))
}

pub(crate) async fn list_for_provider<C: ConnectionTrait>(
    db: &C,
    provider_id: Uuid,
) -> AppResult<Vec<Availability>> {
    let models = AvailabilityEntity::find()
        .filter(availability::Column::ProviderId.eq(provider_id))
        .order_by_asc(availability::Column::CreatedAt)
        .order_by_asc(availability::Column::Id)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Availability::from).collect())
}

pub(crate) async fn list_for_provider_on<C: ConnectionTrait>(
    db: &C,
    provider_id: Uuid,
    date: NaiveDate,
) -> AppResult<Vec<Availability>> {
    let models = AvailabilityEntity::find()
        .filter(availability::Column::ProviderId.eq(provider_id))
        .filter(availability::Column::AvailableDate.eq(date))
        .order_by_asc(availability::Column::StartTime)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Availability::from).collect())
}

pub(crate) async fn create<C: ConnectionTrait>(
    db: &C,
    provider_id: Uuid,
    window: SlotWindow,
) -> AppResult<Availability> {
    let active_model = ActiveModel {
        id: Set(Uuid::now_v7()),
        provider_id: Set(provider_id),
        available_date: Set(window.available_date),
        start_time: Set(window.start_time),
        end_time: Set(window.end_time),
        created_at: Set(Utc::now()),
    };

    let model = active_model
        .insert(db)
        .await
        .map_err(|e| AppError::from_write(e, "Availability slot"))?;
    Ok(Availability::from(model))
}

pub(crate) async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    window: SlotWindow,
) -> AppResult<Availability> {
    let slot = AvailabilityEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = slot.into();
    active.available_date = Set(window.available_date);
    active.start_time = Set(window.start_time);
    active.end_time = Set(window.end_time);

    let model = active
        .update(db)
        .await
        .map_err(|e| AppError::from_write(e, "Availability slot"))?;
    Ok(Availability::from(model))
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let result = AvailabilityEntity::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(())
}

/// Remove every slot of a provider, returning how many were deleted.
pub(crate) async fn delete_for_provider<C: ConnectionTrait>(
    db: &C,
    provider_id: Uuid,
) -> AppResult<u64> {
    let result = AvailabilityEntity::delete_many()
        .filter(availability::Column::ProviderId.eq(provider_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
