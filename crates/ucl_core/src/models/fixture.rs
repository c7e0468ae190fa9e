use super::Team;
use serde::{Deserialize, Serialize};

/// Result of a played fixture from the home side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

/// A scheduled Swiss-phase match.
///
/// Scores are present iff `played` is set. Only the simulator, manual score
/// entry and [`Fixture::reset`] touch them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: String,
    pub home: Team,
    pub away: Team,
    pub matchday: u8,
    pub played: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u8>,
}

impl Fixture {
    pub fn new(home: Team, away: Team, matchday: u8) -> Self {
        Self {
            id: Self::fixture_id(&home.id, &away.id, matchday),
            home,
            away,
            matchday,
            played: false,
            home_score: None,
            away_score: None,
        }
    }

    /// `"{home}-{away}-{matchday}"`
    pub fn fixture_id(home_id: &str, away_id: &str, matchday: u8) -> String {
        format!("{home_id}-{away_id}-{matchday}")
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.home.id == team_id || self.away.id == team_id
    }

    /// Same two teams regardless of who hosts.
    pub fn same_pairing(&self, a: &str, b: &str) -> bool {
        (self.home.id == a && self.away.id == b) || (self.home.id == b && self.away.id == a)
    }

    pub fn opponent_of(&self, team_id: &str) -> Option<&Team> {
        if self.home.id == team_id {
            Some(&self.away)
        } else if self.away.id == team_id {
            Some(&self.home)
        } else {
            None
        }
    }

    pub fn record(&mut self, home_score: u8, away_score: u8) {
        self.home_score = Some(home_score);
        self.away_score = Some(away_score);
        self.played = true;
    }

    /// Clear the result so the fixture can be played again.
    pub fn reset(&mut self) {
        self.home_score = None;
        self.away_score = None;
        self.played = false;
    }

    pub fn score(&self) -> Option<(u8, u8)> {
        if !self.played {
            return None;
        }
        Some((self.home_score?, self.away_score?))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        let (home, away) = self.score()?;
        Some(match home.cmp(&away) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Less => Outcome::AwayWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
        })
    }
}
