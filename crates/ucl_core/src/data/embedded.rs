//! Embedded default roster
//!
//! Thirty-six clubs, nine per pot and at most two per country, so a season
//! can run without any input files. Parsed on first use and cached.

use crate::models::Team;
use std::sync::OnceLock;

pub const DEFAULT_TEAMS_JSON: &str = include_str!("../../data/default_teams.json");

static DEFAULT_TEAMS: OnceLock<Vec<Team>> = OnceLock::new();

/// The default roster, in pot order.
pub fn default_teams() -> &'static [Team] {
    DEFAULT_TEAMS.get_or_init(|| {
        serde_json::from_str(DEFAULT_TEAMS_JSON).expect("Embedded default roster JSON is corrupted")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Pot, Rules};
    use crate::roster::validate_roster;

    #[test]
    fn test_default_roster_is_valid() {
        let teams = default_teams();
        assert_eq!(teams.len(), 36);
        assert!(validate_roster(teams, &Rules::default()).is_empty());
    }

    #[test]
    fn test_nine_clubs_per_pot() {
        for pot in Pot::ALL {
            assert_eq!(default_teams().iter().filter(|t| t.pot == pot).count(), 9, "{pot}");
        }
    }

    #[test]
    fn test_cached_after_first_parse() {
        assert!(std::ptr::eq(default_teams(), default_teams()));
    }
}
