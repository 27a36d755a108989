//! The documents one seed run writes.

use chrono::{DateTime, Utc};
use saboga_kernel::settings::GenerateSettings;

use crate::generate;
use crate::modules::boardgames::{self, models::Boardgame};
use crate::modules::rank_history::{self, models::RankHistory};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub boardgames: Vec<Boardgame>,
    pub rank_history: Vec<RankHistory>,
}

impl Dataset {
    /// The two sample games and their week-old snapshots.
    pub fn fixtures(now: DateTime<Utc>) -> Self {
        Self {
            boardgames: boardgames::fixtures::games(),
            rank_history: rank_history::fixtures::entries(now),
        }
    }
}

/// Where a run takes its documents from.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    Fixtures,
    Generated(GenerateSettings),
}

impl DatasetSource {
    pub fn build(&self, now: DateTime<Utc>) -> anyhow::Result<Dataset> {
        match self {
            Self::Fixtures => Ok(Dataset::fixtures(now)),
            Self::Generated(settings) => generate::dataset(settings, now),
        }
    }
}
