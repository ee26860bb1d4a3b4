//! Service provider database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::ServiceProvider;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "service_providers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub service_type: String,
    pub location: String,
    pub contact_number: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ServiceProvider {
    fn from(model: Model) -> Self {
        ServiceProvider {
            id: model.id,
            user_id: model.user_id,
            email: model.email,
            service_type: model.service_type,
            location: model.location,
            contact_number: model.contact_number,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
