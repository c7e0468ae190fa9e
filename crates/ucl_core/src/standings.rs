//! League table and qualification tiers.

use crate::models::{Fixture, Outcome, Rules, Team};
use serde::Serialize;
use std::collections::HashMap;

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsEntry {
    pub team: Team,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

impl StandingsEntry {
    fn new(team: &Team) -> Self {
        Self {
            team: team.clone(),
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    fn add_result(&mut self, scored: u8, conceded: u8) {
        self.played += 1;
        self.goals_for += u32::from(scored);
        self.goals_against += u32::from(conceded);
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.won += 1;
                self.points += POINTS_FOR_WIN;
            }
            std::cmp::Ordering::Equal => {
                self.drawn += 1;
                self.points += POINTS_FOR_DRAW;
            }
            std::cmp::Ordering::Less => self.lost += 1,
        }
    }
}

/// Build the table from played fixtures.
///
/// Ranked by points, then goal difference, then goals scored; teams level on
/// all three keep roster order. Fixtures naming a team outside `teams` are
/// ignored.
pub fn calculate_standings(teams: &[Team], fixtures: &[Fixture]) -> Vec<StandingsEntry> {
    let mut table: Vec<StandingsEntry> = teams.iter().map(StandingsEntry::new).collect();
    let index: HashMap<&str, usize> =
        teams.iter().enumerate().map(|(i, t)| (t.id.as_str(), i)).collect();

    for fixture in fixtures {
        let Some((home_goals, away_goals)) = fixture.score() else {
            continue;
        };
        let (Some(&home), Some(&away)) =
            (index.get(fixture.home.id.as_str()), index.get(fixture.away.id.as_str()))
        else {
            continue;
        };
        table[home].add_result(home_goals, away_goals);
        table[away].add_result(away_goals, home_goals);
    }

    table.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
    });
    table
}

/// Where a final league position leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QualificationZone {
    /// Straight into the round of 16
    Direct,
    Playoff,
    Eliminated,
}

/// Zone for a 1-based table position.
///
/// Positions between the configured tiers count as eliminated.
pub fn qualification_zone(position: usize, rules: &Rules) -> QualificationZone {
    if position >= 1 && position <= usize::from(rules.auto_qualify_top) {
        QualificationZone::Direct
    } else if position >= usize::from(rules.playoff_positions_start)
        && position <= usize::from(rules.playoff_positions_end)
    {
        QualificationZone::Playoff
    } else {
        QualificationZone::Eliminated
    }
}

/// Zone for every row of a ranked table, in table order.
pub fn zones(standings: &[StandingsEntry], rules: &Rules) -> Vec<(String, QualificationZone)> {
    standings
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry.team.id.clone(), qualification_zone(i + 1, rules)))
        .collect()
}

/// Result tally used by callers that only need the outcome split.
pub fn outcome_counts(fixtures: &[Fixture]) -> (usize, usize, usize) {
    fixtures.iter().filter_map(Fixture::outcome).fold((0, 0, 0), |(h, d, a), outcome| match outcome {
        Outcome::HomeWin => (h + 1, d, a),
        Outcome::Draw => (h, d + 1, a),
        Outcome::AwayWin => (h, d, a + 1),
    })
}
