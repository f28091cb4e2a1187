//! Create polls and poll responses tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Polls::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Polls::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Polls::Question).string_len(512).not_null())
                    .col(
                        ColumnDef::new(Polls::Options)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Polls::AdminId).string_len(64))
                    .col(ColumnDef::new(Polls::CreatedBy).string_len(64))
                    .col(ColumnDef::new(Polls::EndsAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Polls::IsFeaturedPodium)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Polls::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PollResponses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PollResponses::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PollResponses::PollId).string_len(64).not_null())
                    .col(ColumnDef::new(PollResponses::UserId).string_len(64).not_null())
                    .col(
                        ColumnDef::new(PollResponses::SelectedOptionId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PollResponses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(PollResponses::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_poll_responses_poll")
                            .from(PollResponses::Table, PollResponses::PollId)
                            .to(Polls::Table, Polls::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one response per (poll, user); writers upsert
        manager
            .create_index(
                Index::create()
                    .name("idx_poll_responses_poll_user")
                    .table(PollResponses::Table)
                    .col(PollResponses::PollId)
                    .col(PollResponses::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PollResponses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Polls::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Polls {
    Table,
    Id,
    Question,
    Options,
    AdminId,
    CreatedBy,
    EndsAt,
    IsFeaturedPodium,
    CreatedAt,
}

#[derive(Iden)]
enum PollResponses {
    Table,
    Id,
    PollId,
    UserId,
    SelectedOptionId,
    CreatedAt,
    UpdatedAt,
}
