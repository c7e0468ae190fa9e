//! Roster CSV loader
//!
//! Expected columns, with a header row:
//! `id,name,country,coefficient,pot[,logo]`
//!
//! Rows that fail to parse are skipped and counted; the caller decides
//! whether a partial roster is acceptable.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};
use ucl_core::models::{Pot, Team};

#[derive(Debug, Deserialize)]
struct TeamRow {
    id: String,
    name: String,
    country: String,
    coefficient: f64,
    pot: u8,
    #[serde(default)]
    logo: Option<String>,
}

impl TeamRow {
    fn into_team(self) -> Result<Team> {
        let pot = Pot::try_from(self.pot)?;
        let team = Team::new(self.id.trim(), self.name.trim(), self.country.trim(), self.coefficient, pot);
        Ok(match self.logo.filter(|logo| !logo.trim().is_empty()) {
            Some(logo) => team.with_logo(logo),
            None => team,
        })
    }
}

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
}

pub fn parse_roster_reader<R: Read>(reader: R) -> Result<(Vec<Team>, ParseStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut teams = Vec::new();
    let mut stats = ParseStats::default();

    for (row, record) in reader.deserialize::<TeamRow>().enumerate() {
        stats.total_rows += 1;
        // +2: one for the header, one for 1-based line numbers
        let line = row + 2;
        match record.map_err(anyhow::Error::from).and_then(TeamRow::into_team) {
            Ok(team) => {
                teams.push(team);
                stats.parsed += 1;
            }
            Err(e) => {
                warn!(line, error = %e, "skipping roster row");
                stats.failed += 1;
            }
        }
    }

    debug!(parsed = stats.parsed, failed = stats.failed, "roster CSV parsed");
    Ok((teams, stats))
}

pub fn parse_roster_csv(path: &Path) -> Result<(Vec<Team>, ParseStats)> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    parse_roster_reader(file).with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_rows_with_optional_logo() -> Result<()> {
        let csv = "id,name,country,coefficient,pot,logo\n\
                   bay,Bayern München,GER,144,1,bayern.png\n\
                   cel,Celtic,SCO,32.5,3,\n";
        let (teams, stats) = parse_roster_reader(csv.as_bytes())?;

        assert_eq!(stats, ParseStats { total_rows: 2, parsed: 2, failed: 0 });
        assert_eq!(teams[0].logo.as_deref(), Some("bayern.png"));
        assert_eq!(teams[1].pot, Pot::Three);
        assert_eq!(teams[1].logo, None);
        assert!((teams[1].coefficient - 32.5).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_logo_column_is_optional() -> Result<()> {
        let csv = "id,name,country,coefficient,pot\nint,Inter,ITA,101,1\n";
        let (teams, _) = parse_roster_reader(csv.as_bytes())?;
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].logo, None);
        Ok(())
    }

    #[test]
    fn test_bad_rows_counted_not_fatal() -> Result<()> {
        let csv = "id,name,country,coefficient,pot\n\
                   a,A,ENG,10,1\n\
                   b,B,ESP,lots,2\n\
                   c,C,ITA,5,7\n";
        let (teams, stats) = parse_roster_reader(csv.as_bytes())?;
        assert_eq!(teams.len(), 1);
        assert_eq!(stats, ParseStats { total_rows: 3, parsed: 1, failed: 2 });
        Ok(())
    }
}
