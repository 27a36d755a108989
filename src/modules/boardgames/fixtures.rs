//! Sample games written by the fixture seed.

use super::models::Boardgame;

pub fn games() -> Vec<Boardgame> {
    vec![
        Boardgame {
            bgg_id: 1,
            name: "Catan".to_string(),
            bgg_rank: 100,
            bgg_geek_rating: 6.9,
            bgg_average_rating: 7.1,
            description: "Trade, build, and settle the island of Catan.".to_string(),
            image_url: None,
            thumbnail_url: None,
            year_published: 1995,
            minplayers: 3,
            maxplayers: 4,
            playingtime: 90,
            minplaytime: 60,
            maxplaytime: 120,
            ..Boardgame::default()
        },
        Boardgame {
            bgg_id: 2,
            name: "Gloomhaven".to_string(),
            bgg_rank: 1,
            bgg_geek_rating: 8.9,
            bgg_average_rating: 8.7,
            description: "A game of Euro-inspired tactical combat in a persistent world."
                .to_string(),
            image_url: None,
            thumbnail_url: None,
            year_published: 2017,
            minplayers: 1,
            maxplayers: 4,
            playingtime: 120,
            minplaytime: 90,
            maxplaytime: 150,
            ..Boardgame::default()
        },
    ]
}
