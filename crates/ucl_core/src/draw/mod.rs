//! Swiss-phase draw engines
//!
//! Two ways to build the league-phase fixture list from a roster and
//! [`Rules`]:
//!
//! - [`conduct_swiss_draw`]: deterministic, matchday by matchday, constrained
//!   matching first and reported rule relaxation as a last resort.
//! - [`conduct_sequential_draw`]: team by team in pot order with an injected
//!   RNG, producing the ordered [`DrawStep`] list a ceremony can replay.
//!
//! Neither engine silently produces a rules-violating or incomplete schedule:
//! every such condition is returned as a [`DrawIssue`].

pub mod context;
pub mod sequential;
pub mod swiss;

use crate::error::DrawError;
use crate::models::{Fixture, Rules, Team};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

pub use context::{ConstraintSet, DrawContext};
pub use sequential::{
    conduct_sequential_draw, conduct_sequential_draw_with, DrawStep, SequentialDrawOptions,
    SequentialDrawResult,
};
pub use swiss::conduct_swiss_draw;

/// A pairing rule from [`Rules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    NoRematches,
    CountryProtection,
    PotProtection,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Constraint::NoRematches => "no rematches",
            Constraint::CountryProtection => "country protection",
            Constraint::PotProtection => "pot protection",
        };
        f.write_str(label)
    }
}

fn join_constraints(violated: &[Constraint]) -> String {
    violated.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// A recoverable problem found while drawing.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawIssue {
    #[error("Matchday {matchday}: {home} v {away} breaks {}", join_constraints(.violated))]
    ConstraintFallback { matchday: u8, home: String, away: String, violated: Vec<Constraint> },

    #[error("Matchday {matchday}: no eligible opponent for {team}")]
    SlotSkipped { team: String, matchday: u8 },

    #[error("Matchday {matchday}: {team} has no opponent (odd number of teams)")]
    IdleTeam { team: String, matchday: u8 },

    #[error("{team} has {scheduled} of {expected} fixtures")]
    IncompleteSchedule { team: String, expected: u8, scheduled: u8 },
}

/// Fixtures from [`conduct_swiss_draw`] with everything that went wrong.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DrawResult {
    pub fixtures: Vec<Fixture>,
    pub issues: Vec<DrawIssue>,
}

impl DrawResult {
    /// Human-readable problem descriptions, one per issue.
    pub fn errors(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Reject requests that no draw can satisfy before any pairing starts.
pub fn validate_draw_request(teams: &[Team], rules: &Rules) -> Result<(), DrawError> {
    rules.validated().map_err(|e| DrawError::InvalidRules(e.to_string()))?;

    if teams.len() < 2 {
        return Err(DrawError::NotEnoughTeams { found: teams.len(), required: 2 });
    }

    let mut seen = HashSet::new();
    for team in teams {
        if !seen.insert(team.id.as_str()) {
            return Err(DrawError::DuplicateTeam(team.id.clone()));
        }
    }

    // Every team needs a fresh opponent for each matchday.
    let required = usize::from(rules.number_of_matchdays) + 1;
    if rules.no_rematches && teams.len() < required {
        return Err(DrawError::NotEnoughTeams { found: teams.len(), required });
    }

    Ok(())
}

/// One `IncompleteSchedule` issue per team short of a full schedule.
pub(crate) fn incomplete_schedule_issues(
    teams: &[Team],
    fixtures: &[Fixture],
    matchdays: u8,
) -> Vec<DrawIssue> {
    teams
        .iter()
        .filter_map(|team| {
            let scheduled = fixtures.iter().filter(|f| f.involves(&team.id)).count() as u8;
            (scheduled < matchdays).then(|| DrawIssue::IncompleteSchedule {
                team: team.id.clone(),
                expected: matchdays,
                scheduled,
            })
        })
        .collect()
}

/// Structural breaches in a drawn schedule: self-pairings and teams booked
/// twice on one matchday.
pub fn schedule_contract_violations(fixtures: &[Fixture]) -> Vec<String> {
    let mut violations = Vec::new();
    let mut booked = HashSet::new();
    for fixture in fixtures {
        if fixture.home.id == fixture.away.id {
            violations.push(format!("{} is paired with itself", fixture.id));
        }
        for id in [&fixture.home.id, &fixture.away.id] {
            if !booked.insert((fixture.matchday, id.as_str())) {
                violations.push(format!("{id} plays twice on matchday {}", fixture.matchday));
            }
        }
    }
    violations
}

pub(crate) fn enforce_schedule_contracts(fixtures: &[Fixture]) {
    for violation in schedule_contract_violations(fixtures) {
        #[cfg(feature = "strict_contracts")]
        panic!("draw contract violated: {violation}");
        #[cfg(not(feature = "strict_contracts"))]
        tracing::error!(%violation, "draw contract violated");
    }
}
