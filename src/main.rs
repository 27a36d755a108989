use anyhow::Context;
use saboga_db::MongoStore;
use saboga_kernel::settings::Settings;
use saboga_seed::{seed, DatasetSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load seeder settings")?;
    saboga_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        database = %settings.database.name,
        "fixture seed starting"
    );

    let store = MongoStore::connect(&settings.database.uri, &settings.database.name)
        .await
        .with_context(|| format!("failed to connect to {}", settings.database.uri))?;

    let report = seed::seed(&settings, &store, &DatasetSource::Fixtures, false).await?;

    tracing::info!(
        run_id = %report.run_id,
        inserted = report.inserted(),
        "fixture seed complete"
    );
    Ok(())
}
