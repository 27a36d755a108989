//! Entry points shared by the binaries: seed, verify, create the user, and
//! render a store snapshot.

use std::collections::BTreeMap;

use anyhow::Context;
use chrono::{Duration, Utc};
use saboga_db::bson::{Bson, Document};
use saboga_db::DocumentStore;
use saboga_kernel::settings::Settings;
use saboga_kernel::{ModuleRegistry, SeedCtx, SeedReport};

use crate::dataset::{Dataset, DatasetSource};
use crate::modules;

pub fn build_registry(dataset: Dataset, date_tolerance: Duration) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, dataset, date_tolerance);
    registry
}

/// Provision the user, clear both collections, then write the dataset.
/// With `verify` set, the written documents and user access are checked
/// before returning.
pub async fn seed(
    settings: &Settings,
    store: &dyn DocumentStore,
    source: &DatasetSource,
    verify: bool,
) -> anyhow::Result<SeedReport> {
    let now = Utc::now();
    let dataset = source.build(now).context("failed to build the seed dataset")?;
    let registry = build_registry(dataset, Duration::zero());
    let ctx = SeedCtx {
        settings,
        store,
        now,
    };

    let report = registry.run(&ctx).await.context("seed run failed")?;

    if verify {
        registry
            .verify(&ctx)
            .await
            .context("seeded database did not verify")?;
    }

    Ok(report)
}

/// Check a database seeded earlier with the fixtures. Snapshot dates may
/// differ from this call's clock by up to `date_tolerance`.
pub async fn verify_fixtures(
    settings: &Settings,
    store: &dyn DocumentStore,
    date_tolerance: Duration,
) -> anyhow::Result<()> {
    let now = Utc::now();
    let registry = build_registry(Dataset::fixtures(now), date_tolerance);
    let ctx = SeedCtx {
        settings,
        store,
        now,
    };

    registry.verify(&ctx).await
}

/// Run only the user provisioning step.
pub async fn create_user(settings: &Settings, store: &dyn DocumentStore) -> anyhow::Result<()> {
    let mut registry = ModuleRegistry::new();
    registry.register(modules::users::create_module());

    let ctx = SeedCtx {
        settings,
        store,
        now: Utc::now(),
    };
    registry.provision_modules(&ctx).await
}

/// Collections as relaxed extended JSON, keyed by collection name.
pub fn snapshot_json(snapshot: &BTreeMap<String, Vec<Document>>) -> serde_json::Value {
    let collections = snapshot
        .iter()
        .map(|(name, docs)| {
            let docs = docs
                .iter()
                .map(|doc| Bson::Document(doc.clone()).into_relaxed_extjson())
                .collect();
            (name.clone(), serde_json::Value::Array(docs))
        })
        .collect();

    serde_json::Value::Object(collections)
}
