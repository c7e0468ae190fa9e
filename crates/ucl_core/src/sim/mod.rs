//! Stochastic outcome models
//!
//! All randomness comes from a caller-supplied [`rand::Rng`]; seed a
//! `rand_chacha::ChaCha8Rng` for reproducible seasons.

pub mod knockout;
pub mod match_sim;
pub mod schedule;

pub use knockout::{simulate_knockout, Decider, KnockoutScore, KNOCKOUT_HOME_ADVANTAGE};
pub use match_sim::{home_win_probability, simulate_fixture, HOME_ADVANTAGE};
pub use schedule::{
    matchdays, progress, record_score, remove_team, reset_all, simulate_all, simulate_matchday,
    SimulationProgress, MAX_MANUAL_GOALS,
};
