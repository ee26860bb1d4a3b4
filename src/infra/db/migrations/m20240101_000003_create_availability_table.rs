//! Migration: Create availability table.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_service_providers_table::ServiceProviders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Availability::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Availability::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Availability::ProviderId).uuid().not_null())
                    .col(ColumnDef::new(Availability::AvailableDate).date().not_null())
                    .col(ColumnDef::new(Availability::StartTime).time().not_null())
                    .col(ColumnDef::new(Availability::EndTime).time().not_null())
                    .col(
                        ColumnDef::new(Availability::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_availability_provider_id")
                            .from(Availability::Table, Availability::ProviderId)
                            .to(ServiceProviders::Table, ServiceProviders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Backstop for the overlap check done in the workflow
        manager
            .create_index(
                Index::create()
                    .name("idx_availability_provider_date_start")
                    .table(Availability::Table)
                    .col(Availability::ProviderId)
                    .col(Availability::AvailableDate)
                    .col(Availability::StartTime)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Availability::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Availability {
    Table,
    Id,
    ProviderId,
    AvailableDate,
    StartTime,
    EndTime,
    CreatedAt,
}
