//! Migration: Create service providers table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceProviders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceProviders::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceProviders::UserId).uuid().null())
                    // NULL emails never collide, so standalone providers may omit one
                    .col(ColumnDef::new(ServiceProviders::Email).string().null().unique_key())
                    .col(ColumnDef::new(ServiceProviders::ServiceType).string().not_null())
                    .col(ColumnDef::new(ServiceProviders::Location).string().not_null())
                    .col(ColumnDef::new(ServiceProviders::ContactNumber).string().not_null())
                    .col(
                        ColumnDef::new(ServiceProviders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceProviders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_providers_user_id")
                            .from(ServiceProviders::Table, ServiceProviders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_providers_user_id")
                    .table(ServiceProviders::Table)
                    .col(ServiceProviders::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceProviders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum ServiceProviders {
    Table,
    Id,
    UserId,
    Email,
    ServiceType,
    Location,
    ContactNumber,
    CreatedAt,
    UpdatedAt,
}
