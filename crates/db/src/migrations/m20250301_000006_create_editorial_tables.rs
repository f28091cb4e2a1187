//! Create hot takes, sponsors, news stories and weekly highlights tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HotTakes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HotTakes::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HotTakes::Content).text().not_null())
                    .col(ColumnDef::new(HotTakes::AdminId).string_len(64))
                    .col(
                        ColumnDef::new(HotTakes::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HotTakes::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HotTakes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (starts_at, ends_at) for the active-window lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_hot_takes_window")
                    .table(HotTakes::Table)
                    .col(HotTakes::StartsAt)
                    .col(HotTakes::EndsAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sponsors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sponsors::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sponsors::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Sponsors::LogoUrl).string_len(1024))
                    .col(ColumnDef::new(Sponsors::WebsiteUrl).string_len(1024))
                    .col(ColumnDef::new(Sponsors::Description).text())
                    .col(
                        ColumnDef::new(Sponsors::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NewsStories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NewsStories::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NewsStories::Title).string_len(512).not_null())
                    .col(ColumnDef::new(NewsStories::Summary).text())
                    .col(ColumnDef::new(NewsStories::ImageUrl).string_len(1024))
                    .col(ColumnDef::new(NewsStories::SourceUrl).string_len(1024))
                    .col(
                        ColumnDef::new(NewsStories::Featured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(NewsStories::PublishedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_news_stories_published_at")
                    .table(NewsStories::Table)
                    .col(NewsStories::PublishedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WeeklyHighlights::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WeeklyHighlights::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WeeklyHighlights::WeekStartDate)
                            .date()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(WeeklyHighlights::HighlightedFanId).string_len(64))
                    .col(ColumnDef::new(WeeklyHighlights::FanBlurb).text())
                    .col(ColumnDef::new(WeeklyHighlights::SponsorId).string_len(64))
                    .col(ColumnDef::new(WeeklyHighlights::HighlightedGridId).string_len(64))
                    .col(
                        ColumnDef::new(WeeklyHighlights::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_weekly_highlights_sponsor")
                            .from(WeeklyHighlights::Table, WeeklyHighlights::SponsorId)
                            .to(Sponsors::Table, Sponsors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_weekly_highlights_grid")
                            .from(WeeklyHighlights::Table, WeeklyHighlights::HighlightedGridId)
                            .to(Grids::Table, Grids::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WeeklyHighlights::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NewsStories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sponsors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HotTakes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum HotTakes {
    Table,
    Id,
    Content,
    AdminId,
    StartsAt,
    EndsAt,
    CreatedAt,
}

#[derive(Iden)]
enum Sponsors {
    Table,
    Id,
    Name,
    LogoUrl,
    WebsiteUrl,
    Description,
    DisplayOrder,
}

#[derive(Iden)]
enum NewsStories {
    Table,
    Id,
    Title,
    Summary,
    ImageUrl,
    SourceUrl,
    Featured,
    PublishedAt,
}

#[derive(Iden)]
enum WeeklyHighlights {
    Table,
    Id,
    WeekStartDate,
    HighlightedFanId,
    FanBlurb,
    SponsorId,
    HighlightedGridId,
    CreatedAt,
}

#[derive(Iden)]
enum Grids {
    Table,
    Id,
}
