use crate::models::{Rules, Team};
use crate::sim::Decider;
use crate::standings::StandingsEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Clubs needed to seed the round of 16.
pub const BRACKET_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayoffRound {
    #[serde(rename = "round-of-16")]
    RoundOf16,
    QuarterFinals,
    SemiFinals,
    Final,
}

impl PlayoffRound {
    pub const ALL: [PlayoffRound; 4] =
        [PlayoffRound::RoundOf16, PlayoffRound::QuarterFinals, PlayoffRound::SemiFinals, PlayoffRound::Final];

    pub fn match_count(self) -> usize {
        match self {
            PlayoffRound::RoundOf16 => 8,
            PlayoffRound::QuarterFinals => 4,
            PlayoffRound::SemiFinals => 2,
            PlayoffRound::Final => 1,
        }
    }

    pub fn next(self) -> Option<PlayoffRound> {
        match self {
            PlayoffRound::RoundOf16 => Some(PlayoffRound::QuarterFinals),
            PlayoffRound::QuarterFinals => Some(PlayoffRound::SemiFinals),
            PlayoffRound::SemiFinals => Some(PlayoffRound::Final),
            PlayoffRound::Final => None,
        }
    }

    /// Id of the `index`-th match of this round.
    pub fn match_id(self, index: usize) -> String {
        match self {
            PlayoffRound::RoundOf16 => format!("r16-{index}"),
            PlayoffRound::QuarterFinals => format!("qf-{index}"),
            PlayoffRound::SemiFinals => format!("sf-{index}"),
            PlayoffRound::Final => "final".to_string(),
        }
    }
}

impl fmt::Display for PlayoffRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayoffRound::RoundOf16 => "Round of 16",
            PlayoffRound::QuarterFinals => "Quarter-finals",
            PlayoffRound::SemiFinals => "Semi-finals",
            PlayoffRound::Final => "Final",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayoffMatch {
    pub id: String,
    pub round: PlayoffRound,
    pub home: Option<Team>,
    pub away: Option<Team>,
    pub home_score: Option<u8>,
    pub away_score: Option<u8>,
    pub played: bool,
    pub decided_in: Option<Decider>,
    /// Match the winner moves on to; `None` for the final
    pub parent: Option<String>,
}

impl PlayoffMatch {
    fn empty(round: PlayoffRound, index: usize) -> Self {
        Self {
            id: round.match_id(index),
            round,
            home: None,
            away: None,
            home_score: None,
            away_score: None,
            played: false,
            decided_in: None,
            parent: round.next().map(|next| next.match_id(index / 2)),
        }
    }

    /// Both sides known.
    pub fn is_ready(&self) -> bool {
        self.home.is_some() && self.away.is_some()
    }

    /// Side with the strictly higher score of a played match.
    pub fn winner(&self) -> Option<&Team> {
        if !self.played {
            return None;
        }
        let (home_score, away_score) = (self.home_score?, self.away_score?);
        match home_score.cmp(&away_score) {
            std::cmp::Ordering::Greater => self.home.as_ref(),
            std::cmp::Ordering::Less => self.away.as_ref(),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn involves(&self, team_id: &str) -> bool {
        [&self.home, &self.away].into_iter().flatten().any(|t| t.id == team_id)
    }
}

/// All fifteen bracket matches, rounds in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayoffBracket {
    pub(super) matches: Vec<PlayoffMatch>,
}

impl PlayoffBracket {
    /// Bracket seeded from sixteen clubs in table order: the `i`-th plays the
    /// `(15 - i)`-th.
    pub fn seeded(teams: &[Team]) -> Self {
        if teams.len() < BRACKET_SIZE {
            return Self::default();
        }
        let mut matches: Vec<PlayoffMatch> = PlayoffRound::ALL
            .into_iter()
            .flat_map(|round| (0..round.match_count()).map(move |index| PlayoffMatch::empty(round, index)))
            .collect();

        // Round-of-16 matches come first.
        let (top, bottom) = teams[..BRACKET_SIZE].split_at(BRACKET_SIZE / 2);
        for (playoff_match, (home, away)) in matches.iter_mut().zip(top.iter().zip(bottom.iter().rev())) {
            playoff_match.home = Some(home.clone());
            playoff_match.away = Some(away.clone());
        }
        Self { matches }
    }

    /// Empty until the league phase yields sixteen playoff clubs.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn matches(&self) -> &[PlayoffMatch] {
        &self.matches
    }

    pub fn get(&self, id: &str) -> Option<&PlayoffMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub(super) fn position(&self, id: &str) -> Option<usize> {
        self.matches.iter().position(|m| m.id == id)
    }

    pub fn matches_in(&self, round: PlayoffRound) -> impl Iterator<Item = &PlayoffMatch> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Winner of the final, once played.
    pub fn champion(&self) -> Option<&Team> {
        self.get(&PlayoffRound::Final.match_id(0))?.winner()
    }
}

/// Seed the playoff bracket from the final league table.
///
/// Takes positions `playoff_positions_start..=playoff_positions_end`. With
/// fewer than sixteen clubs in that range the bracket is empty.
pub fn build_playoff_bracket(standings: &[StandingsEntry], rules: &Rules) -> PlayoffBracket {
    let start = usize::from(rules.playoff_positions_start).saturating_sub(1);
    let end = usize::from(rules.playoff_positions_end).min(standings.len());
    let teams: Vec<Team> = standings
        .get(start..end.max(start))
        .unwrap_or_default()
        .iter()
        .map(|entry| entry.team.clone())
        .collect();

    if teams.len() < BRACKET_SIZE {
        debug!(clubs = teams.len(), "not enough clubs for the playoff bracket");
        return PlayoffBracket::default();
    }
    info!(first = %teams[0].id, last = %teams[BRACKET_SIZE - 1].id, "seeding playoff bracket");
    PlayoffBracket::seeded(&teams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::test_support::distinct_country_roster;
    use crate::standings::calculate_standings;

    fn table(size: usize) -> Vec<StandingsEntry> {
        calculate_standings(&distinct_country_roster(size), &[])
    }

    #[test]
    fn test_round_tags() {
        let tags: Vec<String> =
            PlayoffRound::ALL.iter().map(|round| serde_json::to_string(round).unwrap()).collect();
        assert_eq!(tags, [r#""round-of-16""#, r#""quarter-finals""#, r#""semi-finals""#, r#""final""#]);
        let parsed: PlayoffRound = serde_json::from_str(r#""round-of-16""#).unwrap();
        assert_eq!(parsed, PlayoffRound::RoundOf16);
    }

    #[test]
    fn test_fifteen_linked_matches() {
        let bracket = build_playoff_bracket(&table(36), &Rules::default());
        assert_eq!(bracket.len(), 15);

        for round in PlayoffRound::ALL {
            assert_eq!(bracket.matches_in(round).count(), round.match_count());
        }
        assert_eq!(bracket.get("r16-5").and_then(|m| m.parent.as_deref()), Some("qf-2"));
        assert_eq!(bracket.get("qf-3").and_then(|m| m.parent.as_deref()), Some("sf-1"));
        assert_eq!(bracket.get("sf-0").and_then(|m| m.parent.as_deref()), Some("final"));
        assert_eq!(bracket.get("final").and_then(|m| m.parent.clone()), None);

        for m in bracket.matches().iter().filter(|m| m.round != PlayoffRound::RoundOf16) {
            assert!(m.home.is_none() && m.away.is_none(), "{} starts empty", m.id);
        }
    }

    #[test]
    fn test_ninth_meets_twenty_fourth() {
        let standings = table(36);
        let bracket = build_playoff_bracket(&standings, &Rules::default());

        let first = bracket.get("r16-0").unwrap();
        assert_eq!(first.home.as_ref().unwrap().id, standings[8].team.id);
        assert_eq!(first.away.as_ref().unwrap().id, standings[23].team.id);

        let last = bracket.get("r16-7").unwrap();
        assert_eq!(last.home.as_ref().unwrap().id, standings[15].team.id);
        assert_eq!(last.away.as_ref().unwrap().id, standings[16].team.id);
    }

    #[test]
    fn test_short_table_gives_empty_bracket() {
        assert!(build_playoff_bracket(&table(20), &Rules::default()).is_empty());
        assert!(build_playoff_bracket(&[], &Rules::default()).is_empty());

        let narrow = Rules { playoff_positions_end: 20, elimination_position: 24, ..Rules::default() };
        assert!(build_playoff_bracket(&table(36), &narrow).is_empty());
    }

    #[test]
    fn test_extra_table_rows_are_ignored() {
        let standings = table(30);
        let bracket = build_playoff_bracket(&standings, &Rules::default());
        assert!(!bracket.matches().iter().any(|m| m.involves(&standings[24].team.id)));
        assert!(!bracket.matches().iter().any(|m| m.involves(&standings[7].team.id)));
    }

    #[test]
    fn test_winner_requires_strictly_higher_score() {
        let mut m = PlayoffMatch::empty(PlayoffRound::Final, 0);
        let teams = distinct_country_roster(2);
        m.home = Some(teams[0].clone());
        m.away = Some(teams[1].clone());
        assert!(m.winner().is_none());

        m.played = true;
        m.home_score = Some(1);
        m.away_score = Some(1);
        assert!(m.winner().is_none());

        m.away_score = Some(2);
        assert_eq!(m.winner().map(|t| t.id.as_str()), Some("t01"));
        assert!(m.involves("t00"));
    }
}
