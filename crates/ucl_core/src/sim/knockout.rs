//! Single-leg knockout model. A knockout tie always produces a winner.

use super::match_sim::home_win_probability;
use crate::models::Team;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Coefficient bonus for the hosting club in a knockout tie.
pub const KNOCKOUT_HOME_ADVANTAGE: f64 = 0.3;

/// How a knockout tie was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decider {
    RegularTime,
    ExtraTime,
    Penalties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnockoutScore {
    pub home: u8,
    pub away: u8,
    pub decided_in: Decider,
}

impl KnockoutScore {
    pub fn home_won(&self) -> bool {
        self.home > self.away
    }
}

/// Each side scores `U[0, 3]` plus one more with its share of strength. A
/// level score adds a single decisive goal, for the home side with
/// probability `p`.
pub fn simulate_knockout<R: Rng + ?Sized>(
    home: &Team,
    away: &Team,
    extra_time: bool,
    rng: &mut R,
) -> KnockoutScore {
    let p = home_win_probability(home, away, KNOCKOUT_HOME_ADVANTAGE);

    let mut home_goals = rng.gen_range(0..=3u8) + u8::from(rng.gen_bool(p));
    let mut away_goals = rng.gen_range(0..=3u8) + u8::from(rng.gen_bool(1.0 - p));

    let decided_in = if home_goals != away_goals {
        Decider::RegularTime
    } else {
        if rng.gen_bool(p) {
            home_goals += 1;
        } else {
            away_goals += 1;
        }
        if extra_time {
            Decider::ExtraTime
        } else {
            Decider::Penalties
        }
    };

    KnockoutScore { home: home_goals, away: away_goals, decided_in }
}
