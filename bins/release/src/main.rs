//! Month-end commission release batch.
//!
//! Re-evaluates the release rule for every (client name, period) group of
//! the target period and flips the `released` flag where it changed. Meant
//! to run from cron on the first days of each month; running it twice is
//! harmless.
//!
//! Usage: release-commissions [--month 3] [--year 2024] [--pending-only]
//!        release-commissions --all-periods

use alianza_core::release::{ReleaseScope, resolve_batch_period};
use alianza_db::repositories::ReleaseRepository;
use alianza_shared::AppConfig;
use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "release-commissions",
    version,
    about = "Release partner commissions of closed, fully paid periods"
)]
struct Cli {
    /// Month to evaluate (1-12); defaults to the previous calendar month
    #[arg(long)]
    month: Option<u32>,

    /// Year of the month; defaults to the year of the target month
    #[arg(long)]
    year: Option<i32>,

    /// Only evaluate groups that still have unreleased commissions
    #[arg(long)]
    pending_only: bool,

    /// Evaluate every period instead of a single month
    #[arg(long, conflicts_with_all = ["month", "year"])]
    all_periods: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alianza=info,release_commissions=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    let today = config.business.today()?;

    let period = if cli.all_periods {
        None
    } else {
        let resolved = resolve_batch_period(cli.month, cli.year, today)?;
        if resolved.fell_back {
            warn!(
                requested = ?cli.month,
                month = resolved.period.month(),
                year = resolved.period.year(),
                "Month out of range, using the previous month"
            );
        }
        Some(resolved.period)
    };

    let db = alianza_db::connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    info!(%today, ?period, pending_only = cli.pending_only, "Running commission release");
    let summary = ReleaseRepository::new(db)
        .run_batch(
            ReleaseScope {
                period,
                pending_only: cli.pending_only,
            },
            today,
        )
        .await?;
    info!(
        released = summary.released,
        held = summary.held,
        "Commission release finished"
    );

    match period {
        _ if summary.periods == 0 => println!("No commissions to process."),
        Some(period) => println!(
            "Periods processed: {} (month {}, year {})",
            summary.periods,
            period.month(),
            period.year()
        ),
        None => println!("Periods processed: {}", summary.periods),
    }
    Ok(())
}
