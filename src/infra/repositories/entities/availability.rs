//! Availability slot database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Availability;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "availability")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub available_date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Availability {
    fn from(model: Model) -> Self {
        Availability {
            id: model.id,
            provider_id: model.provider_id,
            available_date: model.available_date,
            start_time: model.start_time,
            end_time: model.end_time,
            created_at: model.created_at,
        }
    }
}
