//! Synthetic development dataset: games with a daily rank history whose
//! ratings follow the rank.

mod words;

use std::ops::RangeInclusive;

use anyhow::{ensure, Context};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use saboga_kernel::settings::GenerateSettings;

use crate::dataset::Dataset;
use crate::modules::boardgames::models::Boardgame;
use crate::modules::rank_history::models::RankHistory;
use crate::{stats, utils};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrendKind {
    Improving,
    Declining,
    Random,
}

const TREND_KINDS: [TrendKind; 3] = [
    TrendKind::Improving,
    TrendKind::Declining,
    TrendKind::Random,
];

/// Normal sample via Box-Muller.
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    mean + std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn title(rng: &mut StdRng) -> String {
    let count = rng.gen_range(2..=4);
    words::TITLE_WORDS
        .choose_multiple(rng, count)
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn description(rng: &mut StdRng) -> String {
    (0..rng.gen_range(3..=6))
        .map(|_| {
            let count = rng.gen_range(6..=12);
            let sentence = words::DESCRIPTION_WORDS
                .choose_multiple(rng, count)
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            format!("{}.", capitalize(&sentence))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn sample(rng: &mut StdRng, pool: &[&str], min: usize, max: usize) -> Vec<String> {
    let count = rng.gen_range(min..=max);
    pool.choose_multiple(rng, count)
        .map(|name| name.to_string())
        .collect()
}

/// Daily history for one game, oldest first, ending the day before `now`.
fn rank_history(
    rng: &mut StdRng,
    bgg_id: i32,
    days: u32,
    now: DateTime<Utc>,
) -> Vec<RankHistory> {
    let kind = *TREND_KINDS.choose(rng).unwrap_or(&TrendKind::Random);
    let base = f64::from(rng.gen_range(100..=900_i32));

    (0..days)
        .map(|i| {
            let step = f64::from(i);
            let noise = gauss(rng, 0.0, 5.0);
            let rank = match kind {
                TrendKind::Improving => {
                    (base - step * rng.gen_range(1.0_f64..5.0) + noise).max(1.0)
                }
                TrendKind::Declining => {
                    (base + step * rng.gen_range(1.0_f64..5.0) + noise).min(1000.0)
                }
                TrendKind::Random => (base + gauss(rng, 0.0, 50.0)).clamp(1.0, 1000.0),
            };

            // better rank, better rating
            let geek_rating =
                round2(10.0 - (rank / 1000.0 * 3.5) + rng.gen_range(-0.05_f64..0.05));
            let average_rating = round2(geek_rating + rng.gen_range(-0.1_f64..0.1));

            RankHistory {
                bgg_id,
                date: utils::days_before(now, i64::from(days - i)),
                bgg_rank: rank as i32,
                bgg_geek_rating: geek_rating,
                bgg_average_rating: average_rating,
            }
        })
        .collect()
}

fn boardgame(rng: &mut StdRng, bgg_id: i32, history: &[RankHistory]) -> Boardgame {
    let minplayers = rng.gen_range(1..=4);
    let maxplayers = rng.gen_range(minplayers + 1..=(minplayers + 5).min(10));
    let minplaytime = rng.gen_range(15..=60);
    let maxplaytime = rng.gen_range(minplaytime + 5..=minplaytime + 90);

    let (bgg_rank, bgg_geek_rating, bgg_average_rating) = match history.last() {
        Some(latest) => (
            latest.bgg_rank,
            latest.bgg_geek_rating,
            latest.bgg_average_rating,
        ),
        None => (0, 0.0, 0.0),
    };

    Boardgame {
        bgg_id,
        name: title(rng),
        bgg_rank,
        bgg_geek_rating,
        bgg_average_rating,
        description: description(rng),
        image_url: Some(format!("https://picsum.photos/seed/saboga-{bgg_id}/640/480")),
        thumbnail_url: Some(format!("https://picsum.photos/seed/saboga-{bgg_id}/200/150")),
        year_published: rng.gen_range(1990..=2025),
        minplayers,
        maxplayers,
        playingtime: rng.gen_range(minplaytime..=maxplaytime),
        minplaytime,
        maxplaytime,
        categories: sample(rng, words::CATEGORIES, 1, 3),
        families: sample(rng, words::FAMILIES, 0, 2),
        mechanics: sample(rng, words::MECHANICS, 1, 2),
        designers: sample(rng, words::DESIGNERS, 1, 2),
        ..Boardgame::default()
    }
    .with_statistics(stats::volatility(history), stats::trend(history))
}

/// Ids `first_bgg_id..` for `settings.games` games, rejected when the last
/// one does not fit an `i32`.
fn game_ids(settings: &GenerateSettings) -> anyhow::Result<RangeInclusive<i32>> {
    let Some(last_offset) = settings.games.checked_sub(1) else {
        // no games
        return Ok(1..=0);
    };

    let last_id = i32::try_from(last_offset)
        .ok()
        .and_then(|offset| settings.first_bgg_id.checked_add(offset))
        .with_context(|| {
            format!(
                "{} games starting at bgg_id {} run past the largest game id",
                settings.games, settings.first_bgg_id
            )
        })?;

    Ok(settings.first_bgg_id..=last_id)
}

/// Build `settings.games` games with `settings.history_days` snapshots each.
pub fn dataset(settings: &GenerateSettings, now: DateTime<Utc>) -> anyhow::Result<Dataset> {
    ensure!(
        settings.history_days >= 1,
        "generate.history_days must be at least 1"
    );
    let ids = game_ids(settings)?;

    let mut rng = match settings.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut data = Dataset::default();
    for bgg_id in ids {
        let history = rank_history(&mut rng, bgg_id, settings.history_days, now);
        data.boardgames.push(boardgame(&mut rng, bgg_id, &history));
        data.rank_history.extend(history);
    }

    tracing::info!(
        games = data.boardgames.len(),
        history = data.rank_history.len(),
        "generated synthetic dataset"
    );
    Ok(data)
}
