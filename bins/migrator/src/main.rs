//! Database migration runner for Alianza.
//!
//! Usage:
//!   migrator up      - Create the partners, clients, transfers and commissions schema
//!   migrator down    - Drop it again
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! Reads `DATABASE_URL`, optionally from `.env`.

use alianza_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The migrator CLI sets up its own tracing
    cli::run_cli(Migrator).await;
}
