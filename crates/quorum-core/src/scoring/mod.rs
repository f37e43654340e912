//! Vote scoring and trending momentum.

mod engine;

pub use engine::{ScoreEngine, TRENDING_WINDOW_HOURS};
