use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use saboga_db::{DocumentStore, MemoryStore, MongoStore};
use saboga_kernel::settings::Settings;
use saboga_kernel::SeedReport;
use saboga_seed::{seed, DatasetSource};

#[derive(Parser, Debug)]
#[command(name = "saboga", version, about = "Seed the board-game database")]
struct Cli {
    /// Directory holding `base.toml` and `<env>.toml`
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the API user and write the sample games and rank history
    Seed {
        /// Seed an in-memory store and print the result as JSON
        #[arg(long)]
        dry_run: bool,
        /// Do not read the documents back after writing them
        #[arg(long)]
        skip_verify: bool,
    },
    /// Create the API user and write a synthetic dataset
    Generate {
        #[arg(long)]
        games: Option<usize>,
        /// Days of rank history per game
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        days: Option<u32>,
        /// Seed for reproducible output
        #[arg(long)]
        rng_seed: Option<u64>,
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        skip_verify: bool,
    },
    /// Check a database seeded with the sample documents
    Verify {
        /// Allowed drift of snapshot dates from one week ago
        #[arg(long, default_value_t = 24)]
        tolerance_hours: u32,
    },
    /// Only create the API user
    CreateUser,
}

async fn connect(settings: &Settings) -> anyhow::Result<MongoStore> {
    MongoStore::connect(&settings.database.uri, &settings.database.name)
        .await
        .with_context(|| format!("failed to connect to {}", settings.database.uri))
}

fn log_report(report: &SeedReport) {
    for step in &report.steps {
        tracing::info!(
            run_id = %report.run_id,
            module = step.module,
            cleared = step.cleared,
            inserted = step.inserted,
            "step summary"
        );
    }
}

async fn run_seed(
    settings: &Settings,
    source: DatasetSource,
    dry_run: bool,
    verify: bool,
) -> anyhow::Result<()> {
    if dry_run {
        let store = MemoryStore::new(settings.database.name.clone());
        let report = seed::seed(settings, &store, &source, verify).await?;
        log_report(&report);

        let snapshot = seed::snapshot_json(&store.snapshot().await);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let store = connect(settings).await?;
    let report = seed::seed(settings, &store, &source, verify).await?;
    log_report(&report);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load_with(cli.config_dir.as_deref())
        .with_context(|| "failed to load seeder settings")?;
    saboga_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        database = %settings.database.name,
        "saboga cli starting"
    );

    match cli.command {
        Command::Seed {
            dry_run,
            skip_verify,
        } => run_seed(&settings, DatasetSource::Fixtures, dry_run, !skip_verify).await,
        Command::Generate {
            games,
            days,
            rng_seed,
            dry_run,
            skip_verify,
        } => {
            let generate = &mut settings.generate;
            if let Some(games) = games {
                generate.games = games;
            }
            if let Some(days) = days {
                generate.history_days = days;
            }
            if rng_seed.is_some() {
                generate.rng_seed = rng_seed;
            }

            let source = DatasetSource::Generated(settings.generate.clone());
            run_seed(&settings, source, dry_run, !skip_verify).await
        }
        Command::Verify { tolerance_hours } => {
            let store = connect(&settings).await?;
            seed::verify_fixtures(
                &settings,
                &store,
                chrono::Duration::hours(i64::from(tolerance_hours)),
            )
            .await?;
            tracing::info!(database = store.database(), "database matches the sample seed");
            Ok(())
        }
        Command::CreateUser => {
            let store = connect(&settings).await?;
            seed::create_user(&settings, &store).await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run(Cli::parse()).await
}
