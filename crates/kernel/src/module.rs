use async_trait::async_trait;
use chrono::{DateTime, Utc};
use saboga_db::{DocumentStore, IndexSpec};

/// Context handed to modules for every step of a seed run
pub struct SeedCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub store: &'a dyn DocumentStore,
    /// Reference time of the run; relative timestamps derive from it
    pub now: DateTime<Utc>,
}

/// Core trait implemented by every seed module
///
/// A run calls `provision` on all modules, then `clear`, then ensures
/// `indexes`, then `seed`, each phase in registration order.
#[async_trait]
pub trait SeedModule: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Collection owned by this module, if any
    fn collection(&self, _ctx: &SeedCtx<'_>) -> Option<String> {
        None
    }

    /// Indexes to ensure on the owned collection
    fn indexes(&self) -> Vec<IndexSpec> {
        vec![]
    }

    /// Set up server-side state that does not live in a collection
    async fn provision(&self, _ctx: &SeedCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Insert this module's documents, returning how many were written
    async fn seed(&self, _ctx: &SeedCtx<'_>) -> anyhow::Result<usize> {
        Ok(0)
    }

    /// Check that the database reflects what `seed` wrote
    async fn verify(&self, _ctx: &SeedCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}
