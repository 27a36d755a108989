use anyhow::Context;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::module::{SeedCtx, SeedModule};

/// Outcome of one module within a seed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedStep {
    pub module: &'static str,
    pub collection: Option<String>,
    pub cleared: u64,
    pub inserted: usize,
}

/// Summary of a complete seed run
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub steps: Vec<SeedStep>,
}

impl SeedReport {
    pub fn inserted(&self) -> usize {
        self.steps.iter().map(|step| step.inserted).sum()
    }

    pub fn cleared(&self) -> u64 {
        self.steps.iter().map(|step| step.cleared).sum()
    }

    pub fn step(&self, module: &str) -> Option<&SeedStep> {
        self.steps.iter().find(|step| step.module == module)
    }
}

/// Module registry that drives seed runs in registration order
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn SeedModule>>,
}

impl ModuleRegistry {
    /// Create a new module registry
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module; modules run in the order they are registered
    pub fn register(&mut self, module: Arc<dyn SeedModule>) {
        self.modules.push(module);
    }

    /// Provision every module (users, roles)
    pub async fn provision_modules(&self, ctx: &SeedCtx<'_>) -> anyhow::Result<()> {
        for module in &self.modules {
            tracing::info!(module = module.name(), "provisioning module");

            module.provision(ctx).await.with_context(|| {
                format!("failed to provision module '{}'", module.name())
            })?;
        }

        Ok(())
    }

    /// Delete every document from each owned collection
    pub async fn clear_modules(&self, ctx: &SeedCtx<'_>) -> anyhow::Result<Vec<SeedStep>> {
        let mut steps = Vec::with_capacity(self.modules.len());

        for module in &self.modules {
            let collection = module.collection(ctx);
            let cleared = match &collection {
                Some(name) => {
                    let deleted = ctx.store.clear(name).await.with_context(|| {
                        format!("failed to clear module '{}'", module.name())
                    })?;
                    tracing::info!(module = module.name(), collection = %name, deleted, "cleared collection");
                    deleted
                }
                None => 0,
            };

            steps.push(SeedStep {
                module: module.name(),
                collection,
                cleared,
                inserted: 0,
            });
        }

        Ok(steps)
    }

    /// Ensure the indexes each module declares on its collection
    pub async fn ensure_indexes(&self, ctx: &SeedCtx<'_>) -> anyhow::Result<()> {
        for module in &self.modules {
            let Some(collection) = module.collection(ctx) else {
                continue;
            };

            for index in module.indexes() {
                tracing::debug!(module = module.name(), %collection, index = %index.name, "ensuring index");

                ctx.store
                    .ensure_index(&collection, &index)
                    .await
                    .with_context(|| {
                        format!(
                            "failed to create index '{}' for module '{}'",
                            index.name,
                            module.name()
                        )
                    })?;
            }
        }

        Ok(())
    }

    /// Run the full sequence: provision, clear, index, seed
    pub async fn run(&self, ctx: &SeedCtx<'_>) -> anyhow::Result<SeedReport> {
        let run_id = Uuid::now_v7();
        tracing::info!(%run_id, modules = self.modules.len(), "seed run starting");

        self.provision_modules(ctx).await?;
        let mut steps = self.clear_modules(ctx).await?;
        self.ensure_indexes(ctx).await?;

        for (module, step) in self.modules.iter().zip(steps.iter_mut()) {
            step.inserted = module
                .seed(ctx)
                .await
                .with_context(|| format!("failed to seed module '{}'", module.name()))?;

            if step.inserted > 0 {
                tracing::info!(
                    module = module.name(),
                    collection = step.collection.as_deref().unwrap_or_default(),
                    inserted = step.inserted,
                    "seeded collection"
                );
            }
        }

        let report = SeedReport {
            run_id,
            started_at: ctx.now,
            steps,
        };

        tracing::info!(
            %run_id,
            cleared = report.cleared(),
            inserted = report.inserted(),
            "seed run complete"
        );

        Ok(report)
    }

    /// Verify every module against the database
    pub async fn verify(&self, ctx: &SeedCtx<'_>) -> anyhow::Result<()> {
        for module in &self.modules {
            tracing::info!(module = module.name(), "verifying module");

            module
                .verify(ctx)
                .await
                .with_context(|| format!("failed to verify module '{}'", module.name()))?;
        }

        Ok(())
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use saboga_db::bson::doc;
    use saboga_db::{DocumentStore, IndexSpec, MemoryStore};
    use std::sync::Mutex;

    struct TestModule {
        name: &'static str,
        collection: Option<&'static str>,
        events: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl SeedModule for TestModule {
        fn name(&self) -> &'static str {
            self.name
        }

        fn collection(&self, _ctx: &SeedCtx<'_>) -> Option<String> {
            self.collection.map(str::to_string)
        }

        fn indexes(&self) -> Vec<IndexSpec> {
            vec![IndexSpec::ascending(&["n"]).unique()]
        }

        async fn provision(&self, _ctx: &SeedCtx<'_>) -> anyhow::Result<()> {
            self.events.lock().unwrap().push(format!("provision:{}", self.name));
            Ok(())
        }

        async fn seed(&self, ctx: &SeedCtx<'_>) -> anyhow::Result<usize> {
            self.events.lock().unwrap().push(format!("seed:{}", self.name));
            match self.collection {
                Some(collection) => Ok(ctx
                    .store
                    .insert_many(collection, vec![doc! { "n": 1 }, doc! { "n": 2 }])
                    .await?),
                None => Ok(0),
            }
        }
    }

    fn registry(events: &Arc<Mutex<Vec<String>>>) -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(TestModule {
            name: "users",
            collection: None,
            events: events.clone(),
        }));
        registry.register(Arc::new(TestModule {
            name: "things",
            collection: Some("things"),
            events: events.clone(),
        }));
        registry
    }

    #[tokio::test]
    async fn test_empty_registry_runs_without_steps() {
        let registry = ModuleRegistry::default();
        let settings = Settings::default();
        let store = MemoryStore::new("test");
        let ctx = SeedCtx {
            settings: &settings,
            store: &store,
            now: Utc::now(),
        };

        let report = registry.run(&ctx).await.unwrap();
        assert!(report.steps.is_empty());
        assert_eq!(report.inserted(), 0);
    }

    #[tokio::test]
    async fn test_run_orders_phases_and_reports_counts() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let registry = registry(&events);
        let settings = Settings::default();
        let store = MemoryStore::new("test");
        store
            .insert_many("things", vec![doc! { "n": 9 }])
            .await
            .unwrap();
        let ctx = SeedCtx {
            settings: &settings,
            store: &store,
            now: Utc::now(),
        };

        let report = registry.run(&ctx).await.unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            ["provision:users", "provision:things", "seed:users", "seed:things"]
        );
        assert_eq!(report.cleared(), 1);
        assert_eq!(report.inserted(), 2);
        assert_eq!(report.step("users").unwrap().collection, None);
        assert_eq!(report.step("things").unwrap().inserted, 2);
        assert_eq!(store.index_names("things").await, ["n_1"]);
        assert_eq!(store.find_all("things").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let registry = registry(&events);
        let settings = Settings::default();
        let store = MemoryStore::new("test");
        let ctx = SeedCtx {
            settings: &settings,
            store: &store,
            now: Utc::now(),
        };

        registry.run(&ctx).await.unwrap();
        let report = registry.run(&ctx).await.unwrap();

        assert_eq!(report.cleared(), 2);
        assert_eq!(store.find_all("things").await.unwrap().len(), 2);
        registry.verify(&ctx).await.unwrap();
    }
}
