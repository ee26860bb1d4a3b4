//! Booking repository.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::booking::{self, ActiveModel, Entity as BookingEntity};
use crate::domain::{Booking, BookingStatus, NewBooking};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find booking by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;

    /// Bookings made by a user, oldest first
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>>;

    /// Bookings made with a provider, oldest first
    async fn list_by_provider(&self, provider_id: Uuid) -> AppResult<Vec<Booking>>;
}

pub struct BookingStore {
    db: DatabaseConnection,
}

impl BookingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingRepository for BookingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        find_by_id(&self.db, id).await
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        list_where(&self.db, booking::Column::UserId.eq(user_id)).await
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> AppResult<Vec<Booking>> {
        list_where(&self.db, booking::Column::ProviderId.eq(provider_id)).await
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Booking>> {
    let result = BookingEntity::find_by_id(id).one(db).await?;
    Ok(result.map(Booking::from))
}

async fn list_where<C: ConnectionTrait>(
    db: &C,
    condition: sea_orm::sea_query::SimpleExpr,
) -> AppResult<Vec<Booking>> {
    let models = BookingEntity::find()
        .filter(condition)
        .order_by_asc(booking::Column::CreatedAt)
        .order_by_asc(booking::Column::Id)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Booking::from).collect())
}

/// The confirmed booking holding `provider_id` at `date`/`time`, if any.
pub(crate) async fn find_confirmed_at<C: ConnectionTrait>(
    db: &C,
    provider_id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
) -> AppResult<Option<Booking>> {
    let result = BookingEntity::find()
        .filter(booking::Column::ProviderId.eq(provider_id))
        .filter(booking::Column::BookingDate.eq(date))
        .filter(booking::Column::BookingTime.eq(time))
        .filter(booking::Column::Status.eq(BookingStatus::Confirmed.as_str()))
        .one(db)
        .await?;
    Ok(result.map(Booking::from))
}

pub(crate) async fn create<C: ConnectionTrait>(db: &C, booking: NewBooking) -> AppResult<Booking> {
    let now = Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(booking.user_id),
        provider_id: Set(booking.provider_id),
        booking_date: Set(booking.booking_date),
        booking_time: Set(booking.booking_time),
        status: Set(BookingStatus::Confirmed.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model
        .insert(db)
        .await
        .map_err(|e| AppError::from_write(e, "Booking"))?;
    Ok(Booking::from(model))
}

pub(crate) async fn update_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    status: BookingStatus,
) -> AppResult<Booking> {
    let booking = BookingEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = booking.into();
    active.status = Set(status.to_string());
    active.updated_at = Set(Utc::now());

    let model = active.update(db).await?;
    Ok(Booking::from(model))
}
