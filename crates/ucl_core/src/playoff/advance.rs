//! Result propagation through the bracket.

use super::bracket::{PlayoffBracket, PlayoffRound};
use crate::error::BracketError;
use crate::models::{Rules, Team};
use crate::sim::{simulate_knockout, Decider, KnockoutScore};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

/// What [`PlayoffBracket::simulate_match`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BracketOutcome {
    Played(KnockoutScore),
    /// Result already recorded; nothing changed
    AlreadyPlayed,
    /// A feeder match is still undecided
    AwaitingTeams,
}

impl PlayoffBracket {
    /// Move the winner of `match_id` into the first free slot of its parent,
    /// home first.
    ///
    /// Returns whether the bracket changed. Unknown, unplayed, level or
    /// half-filled matches are left alone, as is a winner already seated in
    /// the parent.
    pub fn advance_winner(&mut self, match_id: &str) -> bool {
        let Some(index) = self.position(match_id) else {
            return false;
        };
        let source = &self.matches[index];
        let (Some(winner), Some(parent_id)) = (source.winner().cloned(), source.parent.clone()) else {
            return false;
        };
        if !source.is_ready() {
            return false;
        }
        let Some(parent_index) = self.position(&parent_id) else {
            return false;
        };

        let parent = &mut self.matches[parent_index];
        if parent.involves(&winner.id) {
            return false;
        }
        let slot = if parent.home.is_none() {
            &mut parent.home
        } else if parent.away.is_none() {
            &mut parent.away
        } else {
            return false;
        };
        debug!(from = match_id, to = %parent_id, team = %winner.id, "winner advances");
        *slot = Some(winner);
        true
    }

    /// Enter a knockout result by hand and advance the winner. A recorded
    /// result is final.
    pub fn record_result(
        &mut self,
        match_id: &str,
        home: u8,
        away: u8,
        decided_in: Decider,
    ) -> Result<(), BracketError> {
        let index =
            self.position(match_id).ok_or_else(|| BracketError::MatchNotFound(match_id.to_string()))?;
        let playoff_match = &mut self.matches[index];
        if !playoff_match.is_ready() {
            return Err(BracketError::AwaitingTeams(match_id.to_string()));
        }
        if playoff_match.played {
            return Err(BracketError::AlreadyPlayed(match_id.to_string()));
        }
        if home == away {
            return Err(BracketError::LevelScore { id: match_id.to_string(), score: home });
        }
        playoff_match.home_score = Some(home);
        playoff_match.away_score = Some(away);
        playoff_match.decided_in = Some(decided_in);
        playoff_match.played = true;
        self.advance_winner(match_id);
        Ok(())
    }

    /// Simulate one match and advance its winner.
    pub fn simulate_match<R: Rng + ?Sized>(
        &mut self,
        match_id: &str,
        rules: &Rules,
        rng: &mut R,
    ) -> Result<BracketOutcome, BracketError> {
        let index =
            self.position(match_id).ok_or_else(|| BracketError::MatchNotFound(match_id.to_string()))?;
        let playoff_match = &self.matches[index];
        if playoff_match.played {
            return Ok(BracketOutcome::AlreadyPlayed);
        }
        let (Some(home), Some(away)) = (&playoff_match.home, &playoff_match.away) else {
            return Ok(BracketOutcome::AwaitingTeams);
        };

        let score = simulate_knockout(home, away, rules.extra_time_in_knockout, rng);
        self.record_result(match_id, score.home, score.away, score.decided_in)?;
        Ok(BracketOutcome::Played(score))
    }

    /// Simulate every match of `round` that can be played. Returns how many
    /// were played.
    pub fn simulate_round<R: Rng + ?Sized>(
        &mut self,
        round: PlayoffRound,
        rules: &Rules,
        rng: &mut R,
    ) -> usize {
        let ids: Vec<String> = self.matches_in(round).map(|m| m.id.clone()).collect();
        let mut played = 0;
        for id in ids {
            if let Ok(BracketOutcome::Played(_)) = self.simulate_match(&id, rules, rng) {
                played += 1;
            }
        }
        played
    }

    /// Play every remaining round and return the champion.
    pub fn play_out<R: Rng + ?Sized>(&mut self, rules: &Rules, rng: &mut R) -> Option<&Team> {
        for round in PlayoffRound::ALL {
            let played = self.simulate_round(round, rules, rng);
            debug!(%round, played, "playoff round simulated");
        }
        let champion = self.champion();
        if let Some(team) = champion {
            info!(champion = %team.id, "playoffs complete");
        }
        champion
    }
}
