//! Season runner library
//!
//! File loading and the draw → simulate → table → playoff pipeline behind the
//! `ucl_cli` binary.

pub mod roster_csv;

use anyhow::{bail, Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use ucl_core::api::{DrawMode, RankedEntry};
use ucl_core::draw::{conduct_sequential_draw, conduct_swiss_draw, DrawIssue, DrawStep};
use ucl_core::models::{Fixture, Rules, Team};
use ucl_core::playoff::{build_playoff_bracket, PlayoffBracket};
use ucl_core::roster::{validate_roster, RosterIssue};
use ucl_core::sim::simulate_all;
use ucl_core::standings::{calculate_standings, outcome_counts, qualification_zone};

pub use roster_csv::{parse_roster_csv, parse_roster_reader, ParseStats};

fn extension(path: &Path) -> String {
    path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase()
}

/// Load a roster from `.csv` or `.json`; the embedded default roster when no
/// path is given.
pub fn load_roster(path: Option<&Path>) -> Result<Vec<Team>> {
    let Some(path) = path else {
        return Ok(ucl_core::data::default_teams().to_vec());
    };
    match extension(path).as_str() {
        "csv" => {
            let (teams, stats) = parse_roster_csv(path)?;
            if stats.failed > 0 {
                warn!(failed = stats.failed, path = %path.display(), "some roster rows were skipped");
            }
            Ok(teams)
        }
        "json" => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read roster file: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse roster JSON: {}", path.display()))
        }
        other => bail!("Unsupported roster format '{other}' (expected .csv or .json)"),
    }
}

/// Load rules from `.yaml`/`.yml` or `.json`; defaults when no path is given.
pub fn load_rules(path: Option<&Path>) -> Result<Rules> {
    let Some(path) = path else {
        return Ok(Rules::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
    let rules = match extension(path).as_str() {
        "yaml" | "yml" => Rules::from_yaml_str(&text),
        "json" => Rules::from_json_str(&text),
        other => bail!("Unsupported rules format '{other}' (expected .yaml, .yml or .json)"),
    };
    rules.with_context(|| format!("Invalid rules file: {}", path.display()))
}

#[derive(Debug, Serialize)]
pub struct DrawReport {
    pub generated_at: String,
    pub mode: DrawMode,
    pub seed: u64,
    pub roster_issues: Vec<RosterIssue>,
    pub fixtures: Vec<Fixture>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<DrawStep>,
    pub issues: Vec<DrawIssue>,
}

/// Draw the league phase. `seed` only matters for the sequential mode.
pub fn run_draw(teams: &[Team], rules: &Rules, mode: DrawMode, seed: u64) -> Result<DrawReport> {
    let roster_issues = validate_roster(teams, rules);
    for issue in &roster_issues {
        warn!(%issue, "roster check");
    }

    let (fixtures, steps, issues) = match mode {
        DrawMode::Swiss => {
            let draw = conduct_swiss_draw(teams, rules).context("Draw failed")?;
            (draw.fixtures, Vec::new(), draw.issues)
        }
        DrawMode::Sequential => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let draw = conduct_sequential_draw(teams, rules, &mut rng).context("Draw failed")?;
            (draw.fixtures, draw.steps, draw.issues)
        }
    };

    Ok(DrawReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        mode,
        seed,
        roster_issues,
        fixtures,
        steps,
        issues,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultSplit {
    pub home_wins: usize,
    pub draws: usize,
    pub away_wins: usize,
}

#[derive(Debug, Serialize)]
pub struct SeasonReport {
    pub generated_at: String,
    pub mode: DrawMode,
    pub seed: u64,
    pub roster_issues: Vec<RosterIssue>,
    pub draw_issues: Vec<DrawIssue>,
    pub fixtures: Vec<Fixture>,
    pub results: ResultSplit,
    pub standings: Vec<RankedEntry>,
    pub bracket: PlayoffBracket,
    pub champion: Option<Team>,
}

/// Draw, play the league phase and the playoff bracket with one seed.
pub fn run_season(teams: &[Team], rules: &Rules, mode: DrawMode, seed: u64) -> Result<SeasonReport> {
    let draw = run_draw(teams, rules, mode, seed)?;
    let mut fixtures = draw.fixtures;

    // Offset so the league phase does not replay the ceremony's stream.
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let played = simulate_all(&mut fixtures, rules, &mut rng);
    let (home_wins, draws, away_wins) = outcome_counts(&fixtures);
    info!(played, home_wins, draws, away_wins, "league phase played");

    let table = calculate_standings(teams, &fixtures);
    let mut bracket = build_playoff_bracket(&table, rules);
    let champion = bracket.play_out(rules, &mut rng).cloned();
    match &champion {
        Some(team) => info!(champion = %team.name, "season complete"),
        None => warn!("playoff bracket could not be filled, no champion"),
    }

    let standings = table
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankedEntry { position: i + 1, zone: qualification_zone(i + 1, rules), entry })
        .collect();

    Ok(SeasonReport {
        generated_at: draw.generated_at,
        mode,
        seed,
        roster_issues: draw.roster_issues,
        draw_issues: draw.issues,
        fixtures,
        results: ResultSplit { home_wins, draws, away_wins },
        standings,
        bracket,
        champion,
    })
}

/// Pretty JSON to `out`, or stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(path, json)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
