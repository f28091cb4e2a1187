//! Create tracks, track events, teams and drivers tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tracks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tracks::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tracks::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Tracks::Location).string_len(256))
                    .col(ColumnDef::new(Tracks::Country).string_len(128))
                    .col(ColumnDef::new(Tracks::ImageUrl).string_len(1024))
                    .col(ColumnDef::new(Tracks::StartDate).date())
                    .col(ColumnDef::new(Tracks::EndDate).date())
                    .col(ColumnDef::new(Tracks::Timezone).string_len(64))
                    .col(ColumnDef::new(Tracks::ChatEnabled).boolean())
                    .check(
                        Expr::col(Tracks::StartDate)
                            .is_null()
                            .or(Expr::col(Tracks::EndDate).is_null())
                            .or(Expr::col(Tracks::StartDate).lte(Expr::col(Tracks::EndDate))),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: start_date (calendar ordering)
        manager
            .create_index(
                Index::create()
                    .name("idx_tracks_start_date")
                    .table(Tracks::Table)
                    .col(Tracks::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TrackEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrackEvents::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TrackEvents::TrackId).string_len(64).not_null())
                    .col(ColumnDef::new(TrackEvents::Name).string_len(128).not_null())
                    .col(
                        ColumnDef::new(TrackEvents::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_track_events_track")
                            .from(TrackEvents::Table, TrackEvents::TrackId)
                            .to(Tracks::Table, Tracks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_track_events_track_starts_at")
                    .table(TrackEvents::Table)
                    .col(TrackEvents::TrackId)
                    .col(TrackEvents::StartsAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teams::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Teams::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Teams::LogoUrl).string_len(1024))
                    .col(ColumnDef::new(Teams::BaseLocation).string_len(256))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Drivers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Drivers::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Drivers::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Drivers::TeamId).string_len(64))
                    .col(ColumnDef::new(Drivers::HeadshotUrl).string_len(1024))
                    .col(ColumnDef::new(Drivers::Nationality).string_len(128))
                    .col(ColumnDef::new(Drivers::CarNumber).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_drivers_team")
                            .from(Drivers::Table, Drivers::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Drivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrackEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tracks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tracks {
    Table,
    Id,
    Name,
    Location,
    Country,
    ImageUrl,
    StartDate,
    EndDate,
    Timezone,
    ChatEnabled,
}

#[derive(Iden)]
enum TrackEvents {
    Table,
    Id,
    TrackId,
    Name,
    StartsAt,
}

#[derive(Iden)]
enum Teams {
    Table,
    Id,
    Name,
    LogoUrl,
    BaseLocation,
}

#[derive(Iden)]
enum Drivers {
    Table,
    Id,
    Name,
    TeamId,
    HeadshotUrl,
    Nationality,
    CarNumber,
}
