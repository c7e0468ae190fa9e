//! League-phase match model.
//!
//! The home side's share of combined strength `p` splits the unit interval
//! into three bands: `r < 0.7p` is a home win, `r > 1.3p` an away win and
//! everything between a draw.

use crate::models::{Fixture, Team};
use rand::Rng;

/// Coefficient bonus for the hosting club.
pub const HOME_ADVANTAGE: f64 = 5.0;

const HOME_WIN_BAND: f64 = 0.7;
const AWAY_WIN_BAND: f64 = 1.3;

/// Share of combined strength held by the home side.
///
/// Two zero-strength sides split evenly.
pub fn home_win_probability(home: &Team, away: &Team, home_advantage: f64) -> f64 {
    let home_strength = (home.coefficient + home_advantage).max(0.0);
    let away_strength = away.coefficient.max(0.0);
    let total = home_strength + away_strength;
    if total <= 0.0 {
        0.5
    } else {
        home_strength / total
    }
}

/// Play a fixture, returning a copy with the score recorded.
///
/// With `allow_draws` off a level score gains one goal for the home side with
/// probability `p`, otherwise for the away side.
pub fn simulate_fixture<R: Rng + ?Sized>(fixture: &Fixture, allow_draws: bool, rng: &mut R) -> Fixture {
    let p = home_win_probability(&fixture.home, &fixture.away, HOME_ADVANTAGE);
    let r: f64 = rng.gen();

    let (mut home_goals, mut away_goals) = if r < HOME_WIN_BAND * p {
        let winner = rng.gen_range(1..=3u8);
        (winner, rng.gen_range(0..winner))
    } else if r > AWAY_WIN_BAND * p {
        let winner = rng.gen_range(1..=3u8);
        (rng.gen_range(0..winner), winner)
    } else {
        let goals = rng.gen_range(0..=3u8);
        (goals, goals)
    };

    if !allow_draws && home_goals == away_goals {
        if rng.gen_bool(p) {
            home_goals += 1;
        } else {
            away_goals += 1;
        }
    }

    let mut played = fixture.clone();
    played.record(home_goals, away_goals);
    played
}
