//! Sample rank snapshots written by the fixture seed.

use chrono::{DateTime, Utc};

use super::models::RankHistory;
use crate::utils;

/// Days between the run and the fixture snapshots.
pub const SNAPSHOT_AGE_DAYS: i64 = 7;

pub fn entries(now: DateTime<Utc>) -> Vec<RankHistory> {
    let earlier = utils::days_before(now, SNAPSHOT_AGE_DAYS);

    vec![
        RankHistory {
            bgg_id: 1,
            date: earlier,
            bgg_rank: 105,
            bgg_geek_rating: 6.8,
            bgg_average_rating: 7.0,
        },
        RankHistory {
            bgg_id: 2,
            date: earlier,
            bgg_rank: 2,
            bgg_geek_rating: 8.8,
            bgg_average_rating: 8.6,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshots_are_one_week_old() {
        let now = Utc::now();
        let entries = entries(now);

        assert_eq!(entries.len(), 2);
        for entry in &entries {
            let age = now.timestamp_millis() - entry.date.timestamp_millis();
            assert_eq!(age, SNAPSHOT_AGE_DAYS * 24 * 60 * 60 * 1000);
        }
        assert_eq!(entries[0].bgg_rank, 105);
        assert_eq!(entries[0].bgg_geek_rating, 6.8);
        assert_eq!(entries[1].bgg_rank, 2);
    }
}
