//! Notification repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::notification::{self, ActiveModel, Entity as NotificationEntity};
use crate::domain::{DeliveryStatus, Notification};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Record a notification in `pending` state
    async fn create(&self, user_id: Uuid, subject: String, message: String)
        -> AppResult<Notification>;

    /// Record the delivery outcome
    async fn set_delivery_status(
        &self,
        id: Uuid,
        status: DeliveryStatus,
    ) -> AppResult<Notification>;

    /// Notifications addressed to a user, oldest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>>;
}

pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for NotificationStore {
    async fn create(
        &self,
        user_id: Uuid,
        subject: String,
        message: String,
    ) -> AppResult<Notification> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            subject: Set(subject),
            message: Set(message),
            delivery_status: Set(DeliveryStatus::Pending.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Notification::from(model))
    }

    async fn set_delivery_status(
        &self,
        id: Uuid,
        status: DeliveryStatus,
    ) -> AppResult<Notification> {
        let notification = NotificationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = notification.into();
        active.delivery_status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Notification::from(model))
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let models = NotificationEntity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_asc(notification::Column::CreatedAt)
            .order_by_asc(notification::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Notification::from).collect())
    }
}
