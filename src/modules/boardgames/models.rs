use serde::{Deserialize, Serialize};

/// A board game and its aggregate ranking metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Boardgame {
    /// BoardGameGeek identifier
    pub bgg_id: i32,
    pub name: String,
    pub bgg_rank: i32,
    pub bgg_geek_rating: f64,
    pub bgg_average_rating: f64,
    pub description: String,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub year_published: i32,
    pub minplayers: i32,
    pub maxplayers: i32,
    /// Typical playing time in minutes
    pub playingtime: i32,
    pub minplaytime: i32,
    pub maxplaytime: i32,
    pub categories: Vec<String>,
    pub families: Vec<String>,
    pub mechanics: Vec<String>,
    pub designers: Vec<String>,

    // Derived from rank history; omitted from the document when unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgg_rank_volatility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgg_geek_rating_volatility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgg_average_rating_volatility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgg_rank_trend: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgg_geek_rating_trend: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgg_average_rating_trend: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_trend: Option<f64>,
}

impl Boardgame {
    /// Attach volatility and trend figures computed from rank history.
    pub fn with_statistics(
        mut self,
        volatility: Option<crate::stats::Volatility>,
        trend: Option<crate::stats::Trend>,
    ) -> Self {
        if let Some(v) = volatility {
            self.bgg_rank_volatility = Some(v.rank);
            self.bgg_geek_rating_volatility = Some(v.geek_rating);
            self.bgg_average_rating_volatility = Some(v.average_rating);
        }
        if let Some(t) = trend {
            self.bgg_rank_trend = Some(t.rank);
            self.bgg_geek_rating_trend = Some(t.geek_rating);
            self.bgg_average_rating_trend = Some(t.average_rating);
            self.mean_trend = Some(t.mean);
        }
        self
    }
}
