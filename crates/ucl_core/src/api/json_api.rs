//! JSON entry points
//!
//! Each function takes a request document and returns a response document.
//! Requests carry `schema_version` (currently 1) and, where randomness is
//! involved, a `seed`: the same request always produces the same response.

use crate::draw::{conduct_sequential_draw, conduct_swiss_draw, DrawIssue, DrawStep};
use crate::error::{CoreError, Result};
use crate::models::{Fixture, Rules, Team};
use crate::playoff::{build_playoff_bracket, PlayoffBracket};
use crate::roster::{validate_roster, RosterIssue};
use crate::sim::{progress, simulate_all, simulate_matchday, SimulationProgress};
use crate::standings::{calculate_standings, qualification_zone, QualificationZone, StandingsEntry};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const SCHEMA_VERSION: u8 = 1;

fn check_schema(found: u8) -> Result<()> {
    if found != SCHEMA_VERSION {
        return Err(CoreError::UnsupportedSchema { found, expected: SCHEMA_VERSION });
    }
    Ok(())
}

/// Caller's roster, or the embedded default when none is given.
fn roster_or_default(teams: Option<Vec<Team>>) -> Vec<Team> {
    teams.unwrap_or_else(|| crate::data::default_teams().to_vec())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    #[default]
    Swiss,
    Sequential,
}

#[derive(Debug, Deserialize)]
pub struct DrawRequest {
    pub schema_version: u8,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub teams: Option<Vec<Team>>,
    #[serde(default)]
    pub rules: Rules,
    #[serde(default)]
    pub mode: DrawMode,
}

#[derive(Debug, Serialize)]
pub struct DrawResponse {
    pub schema_version: u8,
    pub fixtures: Vec<Fixture>,
    /// Ceremony order; sequential mode only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<DrawStep>,
    pub roster_issues: Vec<RosterIssue>,
    pub issues: Vec<DrawIssue>,
    pub errors: Vec<String>,
}

pub fn conduct_draw_json(request_json: &str) -> Result<String> {
    let request: DrawRequest = serde_json::from_str(request_json)?;
    check_schema(request.schema_version)?;

    let teams = roster_or_default(request.teams);
    let roster_issues = validate_roster(&teams, &request.rules);
    info!(teams = teams.len(), mode = ?request.mode, "draw request");

    let (fixtures, steps, issues) = match request.mode {
        DrawMode::Swiss => {
            let draw = conduct_swiss_draw(&teams, &request.rules)?;
            (draw.fixtures, Vec::new(), draw.issues)
        }
        DrawMode::Sequential => {
            let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
            let draw = conduct_sequential_draw(&teams, &request.rules, &mut rng)?;
            (draw.fixtures, draw.steps, draw.issues)
        }
    };

    let errors = roster_issues
        .iter()
        .map(ToString::to_string)
        .chain(issues.iter().map(ToString::to_string))
        .collect();
    let response =
        DrawResponse { schema_version: SCHEMA_VERSION, fixtures, steps, roster_issues, issues, errors };
    Ok(serde_json::to_string(&response)?)
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub schema_version: u8,
    #[serde(default)]
    pub seed: u64,
    pub fixtures: Vec<Fixture>,
    #[serde(default)]
    pub rules: Rules,
    /// Only this matchday; every unplayed fixture when absent
    #[serde(default)]
    pub matchday: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub schema_version: u8,
    pub simulated: usize,
    pub progress: SimulationProgress,
    pub fixtures: Vec<Fixture>,
}

pub fn simulate_fixtures_json(request_json: &str) -> Result<String> {
    let request: SimulateRequest = serde_json::from_str(request_json)?;
    check_schema(request.schema_version)?;

    let mut fixtures = request.fixtures;
    let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
    let simulated = match request.matchday {
        Some(matchday) => simulate_matchday(&mut fixtures, matchday, &request.rules, &mut rng),
        None => simulate_all(&mut fixtures, &request.rules, &mut rng),
    };
    debug!(simulated, "fixtures simulated");

    let response = SimulateResponse {
        schema_version: SCHEMA_VERSION,
        simulated,
        progress: progress(&fixtures),
        fixtures,
    };
    Ok(serde_json::to_string(&response)?)
}

#[derive(Debug, Deserialize)]
pub struct StandingsRequest {
    pub schema_version: u8,
    #[serde(default)]
    pub teams: Option<Vec<Team>>,
    pub fixtures: Vec<Fixture>,
    #[serde(default)]
    pub rules: Rules,
}

/// A table row with its position and qualification zone.
#[derive(Debug, Serialize)]
pub struct RankedEntry {
    pub position: usize,
    pub zone: QualificationZone,
    #[serde(flatten)]
    pub entry: StandingsEntry,
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub schema_version: u8,
    pub standings: Vec<RankedEntry>,
}

fn ranked(standings: Vec<StandingsEntry>, rules: &Rules) -> Vec<RankedEntry> {
    standings
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankedEntry { position: i + 1, zone: qualification_zone(i + 1, rules), entry })
        .collect()
}

pub fn standings_json(request_json: &str) -> Result<String> {
    let request: StandingsRequest = serde_json::from_str(request_json)?;
    check_schema(request.schema_version)?;

    let teams = roster_or_default(request.teams);
    let standings = calculate_standings(&teams, &request.fixtures);
    let response =
        StandingsResponse { schema_version: SCHEMA_VERSION, standings: ranked(standings, &request.rules) };
    Ok(serde_json::to_string(&response)?)
}

#[derive(Debug, Deserialize)]
pub struct PlayoffRequest {
    pub schema_version: u8,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub teams: Option<Vec<Team>>,
    pub fixtures: Vec<Fixture>,
    #[serde(default)]
    pub rules: Rules,
    /// Play the bracket to the end instead of returning it unplayed
    #[serde(default)]
    pub play_out: bool,
}

#[derive(Debug, Serialize)]
pub struct PlayoffResponse {
    pub schema_version: u8,
    /// False when fewer than sixteen clubs reached the playoff tier
    pub ready: bool,
    pub bracket: PlayoffBracket,
    pub champion: Option<Team>,
}

pub fn playoff_json(request_json: &str) -> Result<String> {
    let request: PlayoffRequest = serde_json::from_str(request_json)?;
    check_schema(request.schema_version)?;

    let teams = roster_or_default(request.teams);
    let standings = calculate_standings(&teams, &request.fixtures);
    let mut bracket = build_playoff_bracket(&standings, &request.rules);

    let champion = if request.play_out {
        let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
        bracket.play_out(&request.rules, &mut rng).cloned()
    } else {
        bracket.champion().cloned()
    };

    let response =
        PlayoffResponse { schema_version: SCHEMA_VERSION, ready: !bracket.is_empty(), bracket, champion };
    Ok(serde_json::to_string(&response)?)
}
