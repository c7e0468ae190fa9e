//! Roster checks run before a draw is attempted.

use crate::models::{Rules, Team};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Smallest roster that can fill the playoff bracket.
pub const MIN_ROSTER_SIZE: usize = 16;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RosterIssue {
    #[error("At least {required} teams are needed, found {found}")]
    TooFewTeams { found: usize, required: usize },

    #[error("Team id {id} is used more than once")]
    DuplicateId { id: String },

    #[error("{country} has {count} teams, more than the limit of {limit}")]
    CountryOverLimit { country: String, count: usize, limit: u8 },

    #[error("Team {id} has no name")]
    EmptyName { id: String },
}

/// Everything wrong with a roster, in a stable order. An empty result means
/// the roster is ready to draw.
pub fn validate_roster(teams: &[Team], rules: &Rules) -> Vec<RosterIssue> {
    let mut issues = Vec::new();

    if teams.len() < MIN_ROSTER_SIZE {
        issues.push(RosterIssue::TooFewTeams { found: teams.len(), required: MIN_ROSTER_SIZE });
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for team in teams {
        if !seen.insert(team.id.as_str()) && reported.insert(team.id.as_str()) {
            issues.push(RosterIssue::DuplicateId { id: team.id.clone() });
        }
        if team.name.trim().is_empty() {
            issues.push(RosterIssue::EmptyName { id: team.id.clone() });
        }
    }

    let mut per_country: BTreeMap<&str, usize> = BTreeMap::new();
    for team in teams {
        *per_country.entry(team.country.as_str()).or_default() += 1;
    }
    for (country, count) in per_country {
        if count > usize::from(rules.max_teams_per_country) {
            issues.push(RosterIssue::CountryOverLimit {
                country: country.to_string(),
                count,
                limit: rules.max_teams_per_country,
            });
        }
    }

    issues
}
