use saboga_db::bson;
use serde::{Deserialize, Serialize};

/// A game's rank and ratings at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankHistory {
    /// Identifier of the game this snapshot belongs to
    pub bgg_id: i32,
    pub date: bson::DateTime,
    pub bgg_rank: i32,
    pub bgg_geek_rating: f64,
    pub bgg_average_rating: f64,
}
