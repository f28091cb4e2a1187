//! Create grids, grid likes and grid slot comments tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Grids::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grids::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Grids::UserId).string_len(64).not_null())
                    .col(ColumnDef::new(Grids::Type).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Grids::RankedItems)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Grids::Blurb).text())
                    .col(
                        ColumnDef::new(Grids::LikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Grids::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Grids::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grids_user")
                            .from(Grids::Table, Grids::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grids_user_updated_at")
                    .table(Grids::Table)
                    .col(Grids::UserId)
                    .col(Grids::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GridLikes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GridLikes::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GridLikes::GridId).string_len(64).not_null())
                    .col(ColumnDef::new(GridLikes::UserId).string_len(64).not_null())
                    .col(
                        ColumnDef::new(GridLikes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grid_likes_grid")
                            .from(GridLikes::Table, GridLikes::GridId)
                            .to(Grids::Table, Grids::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grid_likes_grid_user")
                    .table(GridLikes::Table)
                    .col(GridLikes::GridId)
                    .col(GridLikes::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GridSlotComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GridSlotComments::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GridSlotComments::GridId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GridSlotComments::RankIndex)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GridSlotComments::UserId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GridSlotComments::Content).text().not_null())
                    .col(
                        ColumnDef::new(GridSlotComments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grid_slot_comments_grid")
                            .from(GridSlotComments::Table, GridSlotComments::GridId)
                            .to(Grids::Table, Grids::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grid_slot_comments_grid")
                    .table(GridSlotComments::Table)
                    .col(GridSlotComments::GridId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GridSlotComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GridLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grids::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Grids {
    Table,
    Id,
    UserId,
    Type,
    RankedItems,
    Blurb,
    LikeCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum GridLikes {
    Table,
    Id,
    GridId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum GridSlotComments {
    Table,
    Id,
    GridId,
    RankIndex,
    UserId,
    Content,
    CreatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
}
