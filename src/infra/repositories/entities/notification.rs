//! Notification database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{DeliveryStatus, Notification};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub delivery_status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Notification {
    fn from(model: Model) -> Self {
        Notification {
            id: model.id,
            user_id: model.user_id,
            subject: model.subject,
            message: model.message,
            delivery_status: DeliveryStatus::from(model.delivery_status.as_str()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
