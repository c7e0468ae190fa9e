//! Ceremony-ordered draw.
//!
//! Teams are drawn one at a time in pot order, each filling its matchdays in
//! ascending order with a uniformly random eligible opponent. The ordered
//! [`DrawStep`] list is what a draw ceremony replays on screen.

use super::{
    enforce_schedule_contracts, incomplete_schedule_issues, validate_draw_request, ConstraintSet,
    DrawContext, DrawIssue,
};
use crate::error::DrawError;
use crate::models::{Fixture, Rules, Team};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

/// One ceremony event, from the drawing team's point of view.
///
/// A pairing is announced twice: once when the first side draws it
/// (`created_fixture == true`) and again when the opponent's turn reaches that
/// matchday.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawStep {
    pub team: Team,
    pub opponent: Team,
    pub matchday: u8,
    pub is_home: bool,
    pub created_fixture: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialDrawOptions {
    /// Ceremonies to run before settling for one with empty slots
    pub max_attempts: usize,
}

impl Default for SequentialDrawOptions {
    fn default() -> Self {
        Self { max_attempts: 25 }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SequentialDrawResult {
    pub steps: Vec<DrawStep>,
    pub fixtures: Vec<Fixture>,
    pub issues: Vec<DrawIssue>,
    /// Ceremony that produced this result, starting at 1
    pub attempt: usize,
}

impl SequentialDrawResult {
    pub fn errors(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Default)]
struct Ceremony {
    steps: Vec<DrawStep>,
    fixtures: Vec<Fixture>,
    empty_slots: Vec<(usize, u8)>,
}

/// [`conduct_sequential_draw_with`] using default options.
pub fn conduct_sequential_draw<R: Rng + ?Sized>(
    teams: &[Team],
    rules: &Rules,
    rng: &mut R,
) -> Result<SequentialDrawResult, DrawError> {
    conduct_sequential_draw_with(teams, rules, rng, SequentialDrawOptions::default())
}

/// Run the ceremony until every slot is filled or `max_attempts` runs are
/// spent; in the latter case the run with the fewest empty slots is returned
/// with those slots reported.
pub fn conduct_sequential_draw_with<R: Rng + ?Sized>(
    teams: &[Team],
    rules: &Rules,
    rng: &mut R,
    options: SequentialDrawOptions,
) -> Result<SequentialDrawResult, DrawError> {
    validate_draw_request(teams, rules)?;
    let order = draw_order(teams);
    info!(teams = teams.len(), max_attempts = options.max_attempts, "conducting sequential draw");

    let mut best = run_ceremony(teams, rules, &order, rng);
    let mut best_attempt = 1;
    let mut attempt = 1;
    while !best.empty_slots.is_empty() && attempt < options.max_attempts {
        attempt += 1;
        debug!(attempt, empty = best.empty_slots.len(), "ceremony incomplete, drawing again");
        let run = run_ceremony(teams, rules, &order, rng);
        if run.empty_slots.len() < best.empty_slots.len() {
            best = run;
            best_attempt = attempt;
        }
    }

    let mut issues: Vec<DrawIssue> = best
        .empty_slots
        .iter()
        .map(|&(team, matchday)| DrawIssue::SlotSkipped { team: teams[team].id.clone(), matchday })
        .collect();
    if !issues.is_empty() {
        warn!(attempts = attempt, empty = issues.len(), "sequential draw left slots empty");
    }

    let mut fixtures = best.fixtures;
    fixtures.sort_by_key(|f| f.matchday);
    issues.extend(incomplete_schedule_issues(teams, &fixtures, rules.number_of_matchdays));
    enforce_schedule_contracts(&fixtures);

    info!(attempt = best_attempt, fixtures = fixtures.len(), "sequential draw complete");
    Ok(SequentialDrawResult { steps: best.steps, fixtures, issues, attempt: best_attempt })
}

/// Roster indices sorted by pot, roster order within a pot.
fn draw_order(teams: &[Team]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..teams.len()).collect();
    order.sort_by_key(|&i| teams[i].pot);
    order
}

fn run_ceremony<R: Rng + ?Sized>(
    teams: &[Team],
    rules: &Rules,
    order: &[usize],
    rng: &mut R,
) -> Ceremony {
    let n = teams.len();
    let rules_set = ConstraintSet::from_rules(rules);
    let mut ctx = DrawContext::new(teams, rules);
    // Fixture index per team and matchday slot.
    let mut booked: Vec<Vec<Option<usize>>> =
        vec![vec![None; usize::from(rules.number_of_matchdays)]; n];
    let mut ceremony = Ceremony::default();

    for &team in order {
        for matchday in 1..=rules.number_of_matchdays {
            let slot = usize::from(matchday - 1);

            if let Some(index) = booked[team][slot] {
                let fixture = &ceremony.fixtures[index];
                let Some(opponent) = fixture.opponent_of(&teams[team].id) else {
                    continue;
                };
                let is_home = fixture.home.id == teams[team].id;
                ceremony.steps.push(DrawStep {
                    team: teams[team].clone(),
                    opponent: opponent.clone(),
                    matchday,
                    is_home,
                    created_fixture: false,
                });
                continue;
            }

            let eligible: Vec<usize> = (0..n)
                .filter(|&o| {
                    booked[o][slot].is_none()
                        && ctx.allows(team, o, matchday, &rules_set)
                        && ctx.can_orient(team, o)
                })
                .collect();
            let Some(&opponent) = eligible.choose(rng) else {
                debug!(team = %teams[team].id, matchday, "no eligible opponent");
                continue;
            };

            let is_home = ctx.can_host(team) && ctx.can_travel(opponent);
            let (home, away) = if is_home { (team, opponent) } else { (opponent, team) };
            ctx.record_meeting(team, opponent);
            ctx.record_home_away(home, away);

            let index = ceremony.fixtures.len();
            ceremony.fixtures.push(Fixture::new(teams[home].clone(), teams[away].clone(), matchday));
            booked[team][slot] = Some(index);
            booked[opponent][slot] = Some(index);
            ceremony.steps.push(DrawStep {
                team: teams[team].clone(),
                opponent: teams[opponent].clone(),
                matchday,
                is_home,
                created_fixture: true,
            });
        }
    }

    // A slot skipped on a team's own turn may still be filled by a later drawer.
    for &team in order {
        for (slot, booking) in booked[team].iter().enumerate() {
            if booking.is_none() {
                ceremony.empty_slots.push((team, slot as u8 + 1));
            }
        }
    }
    ceremony
}
