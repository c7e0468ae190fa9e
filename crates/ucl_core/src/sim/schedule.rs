//! Whole-schedule operations: batch simulation, manual results and resets.
//!
//! Fixtures already played are never re-simulated; reset them first.

use super::match_sim::simulate_fixture;
use crate::error::ScheduleError;
use crate::models::{Fixture, Rules};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Largest score accepted by manual entry.
pub const MAX_MANUAL_GOALS: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationProgress {
    pub played: usize,
    pub total: usize,
}

impl SimulationProgress {
    pub fn is_finished(&self) -> bool {
        self.played == self.total
    }

    /// Played share in percent, 0 for an empty schedule.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.played as f64 * 100.0 / self.total as f64
        }
    }
}

/// Simulate the unplayed fixtures of one matchday. Returns how many were
/// played.
pub fn simulate_matchday<R: Rng + ?Sized>(
    fixtures: &mut [Fixture],
    matchday: u8,
    rules: &Rules,
    rng: &mut R,
) -> usize {
    let mut played = 0;
    for fixture in fixtures.iter_mut().filter(|f| f.matchday == matchday && !f.played) {
        *fixture = simulate_fixture(fixture, rules.allow_draws, rng);
        played += 1;
    }
    debug!(matchday, played, "matchday simulated");
    played
}

/// Simulate every unplayed fixture, matchday by matchday.
pub fn simulate_all<R: Rng + ?Sized>(fixtures: &mut [Fixture], rules: &Rules, rng: &mut R) -> usize {
    let played: usize = matchdays(fixtures)
        .into_iter()
        .map(|matchday| simulate_matchday(fixtures, matchday, rules, rng))
        .sum();
    info!(played, "schedule simulated");
    played
}

pub fn reset_all(fixtures: &mut [Fixture]) {
    fixtures.iter_mut().for_each(Fixture::reset);
}

/// Enter a result by hand. Overwrites any earlier result for the fixture.
pub fn record_score(
    fixtures: &mut [Fixture],
    fixture_id: &str,
    home: u8,
    away: u8,
) -> Result<(), ScheduleError> {
    if home > MAX_MANUAL_GOALS || away > MAX_MANUAL_GOALS {
        return Err(ScheduleError::ScoreOutOfRange { home, away, max: MAX_MANUAL_GOALS });
    }
    let fixture = fixtures
        .iter_mut()
        .find(|f| f.id == fixture_id)
        .ok_or_else(|| ScheduleError::FixtureNotFound(fixture_id.to_string()))?;
    fixture.record(home, away);
    Ok(())
}

/// Drop every fixture involving `team_id`. Returns how many were removed.
pub fn remove_team(fixtures: &mut Vec<Fixture>, team_id: &str) -> usize {
    let before = fixtures.len();
    fixtures.retain(|f| !f.involves(team_id));
    before - fixtures.len()
}

pub fn progress(fixtures: &[Fixture]) -> SimulationProgress {
    SimulationProgress { played: fixtures.iter().filter(|f| f.played).count(), total: fixtures.len() }
}

/// Distinct matchdays present, ascending.
pub fn matchdays(fixtures: &[Fixture]) -> Vec<u8> {
    fixtures.iter().map(|f| f.matchday).collect::<BTreeSet<_>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::conduct_swiss_draw;
    use crate::draw::test_support::distinct_country_roster;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn schedule() -> Vec<Fixture> {
        conduct_swiss_draw(&distinct_country_roster(16), &Rules::default()).unwrap().fixtures
    }

    #[test]
    fn test_matchday_simulation_touches_only_that_matchday() {
        let mut fixtures = schedule();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(simulate_matchday(&mut fixtures, 3, &Rules::default(), &mut rng), 8);
        for fixture in &fixtures {
            assert_eq!(fixture.played, fixture.matchday == 3);
        }
        assert_eq!(progress(&fixtures), SimulationProgress { played: 8, total: 64 });
    }

    #[test]
    fn test_played_fixtures_are_not_resimulated() {
        let mut fixtures = schedule();
        let id = fixtures[0].id.clone();
        record_score(&mut fixtures, &id, 7, 0).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(simulate_all(&mut fixtures, &Rules::default(), &mut rng), 63);
        assert_eq!(fixtures[0].score(), Some((7, 0)));
        assert!(progress(&fixtures).is_finished());
    }

    #[test]
    fn test_reset_clears_results() {
        let mut fixtures = schedule();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        simulate_all(&mut fixtures, &Rules::default(), &mut rng);
        reset_all(&mut fixtures);
        assert_eq!(progress(&fixtures).played, 0);
        assert!(fixtures.iter().all(|f| f.home_score.is_none() && f.away_score.is_none()));
    }

    #[test]
    fn test_manual_score_validation() {
        let mut fixtures = schedule();
        let id = fixtures[5].id.clone();
        assert_eq!(
            record_score(&mut fixtures, &id, 21, 0),
            Err(ScheduleError::ScoreOutOfRange { home: 21, away: 0, max: 20 })
        );
        assert_eq!(
            record_score(&mut fixtures, "nope", 1, 0),
            Err(ScheduleError::FixtureNotFound("nope".to_string()))
        );
        record_score(&mut fixtures, &id, 20, 20).unwrap();
        assert_eq!(fixtures[5].score(), Some((20, 20)));
    }

    #[test]
    fn test_remove_team_drops_its_fixtures() {
        let mut fixtures = schedule();
        assert_eq!(remove_team(&mut fixtures, "t04"), 8);
        assert_eq!(fixtures.len(), 56);
        assert!(fixtures.iter().all(|f| !f.involves("t04")));
        assert_eq!(remove_team(&mut fixtures, "t04"), 0);
    }

    #[test]
    fn test_matchdays_listed_in_order() {
        assert_eq!(matchdays(&schedule()), (1..=8).collect::<Vec<u8>>());
        assert_eq!(progress(&[]).percent(), 0.0);
    }
}
