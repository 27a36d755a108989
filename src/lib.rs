//! Board-game database seeding.
//!
//! Provisions the API user, resets the games and rank-history collections,
//! and writes either the fixed sample documents or a synthetic dataset.

pub mod dataset;
pub mod generate;
pub mod modules;
pub mod seed;
pub mod stats;
pub mod utils;

pub use dataset::{Dataset, DatasetSource};
