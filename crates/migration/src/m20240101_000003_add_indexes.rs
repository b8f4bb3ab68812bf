use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_entries::Entries;
use crate::m20240101_000002_create_images::Images;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_entries_created_at")
                    .table(Entries::Table)
                    .col(Entries::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_images_entry_id")
                    .table(Images::Table)
                    .col(Images::EntryId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_images_entry_id").table(Images::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_entries_created_at").table(Entries::Table).to_owned())
            .await
    }
}
