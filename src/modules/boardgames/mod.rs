pub mod fixtures;
pub mod models;

use async_trait::async_trait;
use saboga_db::IndexSpec;
use saboga_kernel::{SeedCtx, SeedModule};

use crate::utils;
use models::Boardgame;

/// Writes board game documents into the configured games collection
pub struct BoardgamesModule {
    games: Vec<Boardgame>,
}

impl BoardgamesModule {
    pub fn new(games: Vec<Boardgame>) -> Self {
        Self { games }
    }
}

#[async_trait]
impl SeedModule for BoardgamesModule {
    fn name(&self) -> &'static str {
        "boardgames"
    }

    fn collection(&self, ctx: &SeedCtx<'_>) -> Option<String> {
        Some(ctx.settings.collections.boardgames.clone())
    }

    fn indexes(&self) -> Vec<IndexSpec> {
        vec![
            IndexSpec::ascending(&["bgg_id"]).unique(),
            IndexSpec::ascending(&["bgg_rank"]),
        ]
    }

    async fn seed(&self, ctx: &SeedCtx<'_>) -> anyhow::Result<usize> {
        let documents = utils::to_documents(&self.games)?;
        let inserted = ctx
            .store
            .insert_many(&ctx.settings.collections.boardgames, documents)
            .await?;

        tracing::debug!(
            target: "saboga.modules",
            prefix = %utils::log_prefix(self.name()),
            collection = %ctx.settings.collections.boardgames,
            inserted,
            "documents written"
        );
        Ok(inserted)
    }

    async fn verify(&self, ctx: &SeedCtx<'_>) -> anyhow::Result<()> {
        utils::verify_collection(
            ctx.store,
            &ctx.settings.collections.boardgames,
            &self.games,
            |game| game.bgg_id,
            |found, wanted| found == wanted,
        )
        .await
    }
}

/// Create a new instance of the boardgames module
pub fn create_module(games: Vec<Boardgame>) -> std::sync::Arc<dyn SeedModule> {
    std::sync::Arc::new(BoardgamesModule::new(games))
}
