//! Volatility and trend figures derived from a game's rank history.

use crate::modules::rank_history::models::RankHistory;

const MILLIS_PER_DAY: i64 = 86_400_000;
/// Trends only consider the most recent snapshots.
const TREND_WINDOW: usize = 30;

/// Coefficient of variation of each tracked value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volatility {
    pub rank: f64,
    pub geek_rating: f64,
    pub average_rating: f64,
}

/// Relative change over the observed window, in percent. A positive rank
/// trend means the game is climbing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub rank: f64,
    pub geek_rating: f64,
    pub average_rating: f64,
    pub mean: f64,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation over mean; `None` below two samples.
fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let mean = mean(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt() / mean)
}

/// Least-squares slope of `ys` against `xs`; `None` when `xs` is constant.
fn slope(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let x_mean = mean(xs);
    let y_mean = mean(ys);

    let (covariance, variance) = xs.iter().zip(ys).fold((0.0, 0.0), |(cov, var), (x, y)| {
        (cov + (x - x_mean) * (y - y_mean), var + (x - x_mean).powi(2))
    });

    if variance == 0.0 {
        None
    } else {
        Some(covariance / variance)
    }
}

fn columns(history: &[RankHistory]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let ranks = history.iter().map(|h| f64::from(h.bgg_rank)).collect();
    let geek = history.iter().map(|h| h.bgg_geek_rating).collect();
    let average = history.iter().map(|h| h.bgg_average_rating).collect();
    (ranks, geek, average)
}

pub fn volatility(history: &[RankHistory]) -> Option<Volatility> {
    if history.is_empty() {
        tracing::warn!("no rank history provided for volatility");
        return None;
    }

    let (ranks, geek, average) = columns(history);
    Some(Volatility {
        rank: coefficient_of_variation(&ranks)?,
        geek_rating: coefficient_of_variation(&geek)?,
        average_rating: coefficient_of_variation(&average)?,
    })
}

/// Trend over the last 30 snapshots, ordered by date.
pub fn trend(history: &[RankHistory]) -> Option<Trend> {
    if history.is_empty() {
        tracing::warn!("no rank history provided for trend");
        return None;
    }

    let window = &history[history.len().saturating_sub(TREND_WINDOW)..];
    let day = |entry: &RankHistory| entry.date.timestamp_millis().div_euclid(MILLIS_PER_DAY);

    let days: Vec<f64> = window.iter().map(|entry| day(entry) as f64).collect();
    let span = (window[window.len() - 1].date.timestamp_millis()
        - window[0].date.timestamp_millis())
    .div_euclid(MILLIS_PER_DAY) as f64;

    let (ranks, geek, average) = columns(window);

    let rank = -slope(&days, &ranks)? * span / mean(&ranks) * 100.0;
    let geek_rating = slope(&days, &geek)? * span / mean(&geek) * 100.0;
    let average_rating = slope(&days, &average)? * span / mean(&average) * 100.0;

    Some(Trend {
        rank,
        geek_rating,
        average_rating,
        mean: (rank + geek_rating + average_rating) / 3.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use saboga_db::bson;

    fn entry(day: i64, rank: i32, geek: f64, average: f64) -> RankHistory {
        RankHistory {
            bgg_id: 1,
            date: bson::DateTime::from_millis(day * MILLIS_PER_DAY),
            bgg_rank: rank,
            bgg_geek_rating: geek,
            bgg_average_rating: average,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_volatility_uses_sample_deviation() {
        let history = [entry(0, 10, 7.0, 7.0), entry(1, 20, 7.0, 8.0), entry(2, 30, 7.0, 9.0)];
        let v = volatility(&history).unwrap();

        // ranks: mean 20, sample std 10
        assert!(close(v.rank, 0.5));
        assert!(close(v.geek_rating, 0.0));
        assert!(close(v.average_rating, 1.0 / 8.0));
    }

    #[test]
    fn test_volatility_needs_two_samples() {
        assert!(volatility(&[]).is_none());
        assert!(volatility(&[entry(0, 10, 7.0, 7.0)]).is_none());
    }

    #[test]
    fn test_improving_rank_has_positive_trend() {
        // rank drops by 2 per day from 100 to 80 over 10 days
        let history: Vec<RankHistory> = (0..=10)
            .map(|d| entry(d, 100 - 2 * d as i32, 7.0 + 0.1 * d as f64, 7.5))
            .collect();
        let t = trend(&history).unwrap();

        // slope -2, span 10, mean rank 90
        assert!(close(t.rank, 2.0 * 10.0 / 90.0 * 100.0));
        assert!(t.geek_rating > 0.0);
        assert!(close(t.average_rating, 0.0));
        assert!(close(t.mean, (t.rank + t.geek_rating + t.average_rating) / 3.0));
    }

    #[test]
    fn test_trend_window_and_degenerate_input() {
        assert!(trend(&[]).is_none());
        // single day gives no slope
        assert!(trend(&[entry(5, 10, 7.0, 7.0)]).is_none());

        let history: Vec<RankHistory> = (0..45).map(|d| entry(d, 500, 7.0, 7.0)).collect();
        let t = trend(&history).unwrap();
        assert!(close(t.rank, 0.0));
    }
}
