//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_profile_tables;
mod m20250301_000002_create_reference_tables;
mod m20250301_000003_create_poll_tables;
mod m20250301_000004_create_post_tables;
mod m20250301_000005_create_grid_tables;
mod m20250301_000006_create_editorial_tables;
mod m20250301_000007_create_chat_message_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_profile_tables::Migration),
            Box::new(m20250301_000002_create_reference_tables::Migration),
            Box::new(m20250301_000003_create_poll_tables::Migration),
            Box::new(m20250301_000004_create_post_tables::Migration),
            Box::new(m20250301_000005_create_grid_tables::Migration),
            Box::new(m20250301_000006_create_editorial_tables::Migration),
            Box::new(m20250301_000007_create_chat_message_table::Migration),
        ]
    }
}
