pub mod fixtures;
pub mod models;

use async_trait::async_trait;
use chrono::Duration;
use saboga_db::IndexSpec;
use saboga_kernel::{SeedCtx, SeedModule};

use crate::utils;
use models::RankHistory;

/// Writes rank snapshots into the configured history collection
pub struct RankHistoryModule {
    entries: Vec<RankHistory>,
    date_tolerance: Duration,
}

impl RankHistoryModule {
    pub fn new(entries: Vec<RankHistory>) -> Self {
        Self {
            entries,
            date_tolerance: Duration::zero(),
        }
    }

    /// Accept stored snapshot dates within `tolerance` of the expected ones,
    /// for verifying a database seeded by an earlier run.
    pub fn with_date_tolerance(mut self, tolerance: Duration) -> Self {
        self.date_tolerance = tolerance;
        self
    }

    fn same_snapshot(&self, found: &RankHistory, wanted: &RankHistory) -> bool {
        let drift = (found.date.timestamp_millis() - wanted.date.timestamp_millis()).abs();
        found.bgg_id == wanted.bgg_id
            && found.bgg_rank == wanted.bgg_rank
            && found.bgg_geek_rating == wanted.bgg_geek_rating
            && found.bgg_average_rating == wanted.bgg_average_rating
            && drift <= self.date_tolerance.num_milliseconds()
    }
}

#[async_trait]
impl SeedModule for RankHistoryModule {
    fn name(&self) -> &'static str {
        "rank_history"
    }

    fn collection(&self, ctx: &SeedCtx<'_>) -> Option<String> {
        Some(ctx.settings.collections.rank_history.clone())
    }

    fn indexes(&self) -> Vec<IndexSpec> {
        // One snapshot per game per instant.
        vec![IndexSpec::ascending(&["bgg_id", "date"]).unique()]
    }

    async fn seed(&self, ctx: &SeedCtx<'_>) -> anyhow::Result<usize> {
        let documents = utils::to_documents(&self.entries)?;
        let inserted = ctx
            .store
            .insert_many(&ctx.settings.collections.rank_history, documents)
            .await?;

        tracing::debug!(
            target: "saboga.modules",
            prefix = %utils::log_prefix(self.name()),
            collection = %ctx.settings.collections.rank_history,
            inserted,
            "documents written"
        );
        Ok(inserted)
    }

    async fn verify(&self, ctx: &SeedCtx<'_>) -> anyhow::Result<()> {
        utils::verify_collection(
            ctx.store,
            &ctx.settings.collections.rank_history,
            &self.entries,
            |entry| (entry.bgg_id, entry.date.timestamp_millis()),
            |found, wanted| self.same_snapshot(found, wanted),
        )
        .await
    }
}

/// Create a new instance of the rank history module
pub fn create_module(
    entries: Vec<RankHistory>,
    date_tolerance: Duration,
) -> std::sync::Arc<dyn SeedModule> {
    std::sync::Arc::new(RankHistoryModule::new(entries).with_date_tolerance(date_tolerance))
}
