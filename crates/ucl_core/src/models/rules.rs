//! Tournament rules
//!
//! Caller-supplied configuration for the Swiss phase, the qualification tiers
//! and match settings. Field names serialize in camelCase so rule files
//! written for the web front end load unchanged.
//!
//! ```rust
//! use ucl_core::models::Rules;
//!
//! let rules = Rules::from_yaml_str("numberOfMatchdays: 6\npotProtection: true\n").unwrap();
//! assert_eq!(rules.number_of_matchdays, 6);
//! assert!(rules.country_protection, "unspecified fields keep their defaults");
//! ```

use crate::error::ConfigError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "validate_positions"))]
pub struct Rules {
    // Swiss system
    /// Rounds each team plays in the Swiss phase
    #[validate(range(min = 6, max = 10))]
    pub number_of_matchdays: u8,
    /// Cap home and away appearances to half the matchdays (rounded up)
    pub home_away_balance: bool,

    // Draw constraints
    /// Two clubs from the same country never meet
    pub country_protection: bool,
    /// Two clubs meet at most once
    pub no_rematches: bool,
    /// Same-pot pairings are forbidden on matchday 1 only
    pub pot_protection: bool,
    /// Roster-level limit; checked by roster validation, never while pairing
    #[validate(range(min = 1, max = 8))]
    pub max_teams_per_country: u8,

    // Qualification tiers
    #[validate(range(min = 0, max = 16))]
    pub auto_qualify_top: u8,
    #[validate(range(min = 9, max = 17))]
    pub playoff_positions_start: u8,
    #[validate(range(min = 16, max = 24))]
    pub playoff_positions_end: u8,
    #[validate(range(min = 24, max = 36))]
    pub elimination_position: u8,

    // Match settings
    pub allow_draws: bool,
    /// Level knockout ties go to extra time; otherwise straight to penalties
    pub extra_time_in_knockout: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            number_of_matchdays: 8,
            home_away_balance: true,
            country_protection: true,
            no_rematches: true,
            pot_protection: false,
            max_teams_per_country: 2,
            auto_qualify_top: 8,
            playoff_positions_start: 9,
            playoff_positions_end: 24,
            elimination_position: 25,
            allow_draws: true,
            extra_time_in_knockout: true,
        }
    }
}

fn validate_positions(rules: &Rules) -> Result<(), ValidationError> {
    if rules.playoff_positions_start > rules.playoff_positions_end {
        return Err(ValidationError::new("playoff_start_after_end"));
    }
    if rules.auto_qualify_top >= rules.playoff_positions_start {
        return Err(ValidationError::new("auto_qualify_overlaps_playoff"));
    }
    if rules.elimination_position <= rules.playoff_positions_end {
        return Err(ValidationError::new("elimination_overlaps_playoff"));
    }
    Ok(())
}

impl Rules {
    /// Maximum home (and away) appearances per team when balance is enforced.
    pub fn home_away_cap(&self) -> u32 {
        (u32::from(self.number_of_matchdays) + 1) / 2
    }

    /// Range and cross-field checks.
    pub fn validated(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|errors| ConfigError::Invalid(errors.to_string()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let rules: Rules = serde_yaml::from_str(yaml)?;
        rules.validated()?;
        Ok(rules)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let rules: Rules = serde_json::from_str(json)?;
        rules.validated()?;
        Ok(rules)
    }
}

/// JSON schema of the rules document, for editors that build rule files.
pub fn rules_schema_json() -> Result<String, ConfigError> {
    let schema = schemars::schema_for!(Rules);
    Ok(serde_json::to_string_pretty(&schema)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let rules = Rules::default();
        assert!(rules.validated().is_ok());
        assert_eq!(rules.home_away_cap(), 4);
    }

    #[test]
    fn test_cap_rounds_up_for_odd_matchdays() {
        let rules = Rules { number_of_matchdays: 7, ..Rules::default() };
        assert_eq!(rules.home_away_cap(), 4);
        let rules = Rules { number_of_matchdays: 9, ..Rules::default() };
        assert_eq!(rules.home_away_cap(), 5);
    }

    #[test]
    fn test_matchdays_out_of_range() {
        let rules = Rules { number_of_matchdays: 11, ..Rules::default() };
        let err = rules.validated().unwrap_err();
        assert!(err.to_string().contains("number_of_matchdays"), "{err}");

        let rules = Rules { number_of_matchdays: 5, ..Rules::default() };
        assert!(rules.validated().is_err());
    }

    #[test]
    fn test_overlapping_tiers_rejected() {
        let rules = Rules { auto_qualify_top: 10, ..Rules::default() };
        assert!(rules.validated().is_err());

        let rules =
            Rules { playoff_positions_start: 17, playoff_positions_end: 16, ..Rules::default() };
        assert!(rules.validated().is_err());

        let rules = Rules { elimination_position: 24, ..Rules::default() };
        assert!(rules.validated().is_err());
    }

    #[test]
    fn test_yaml_partial_document_keeps_defaults() {
        let rules = Rules::from_yaml_str("potProtection: true\nallowDraws: false\n").unwrap();
        assert!(rules.pot_protection);
        assert!(!rules.allow_draws);
        assert_eq!(rules.number_of_matchdays, 8);
    }

    #[test]
    fn test_json_invalid_document_rejected() {
        let result = Rules::from_json_str(r#"{"numberOfMatchdays": 3}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = Rules::from_json_str("{not json");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_schema_mentions_fields() {
        let schema = rules_schema_json().unwrap();
        assert!(schema.contains("numberOfMatchdays"));
        assert!(schema.contains("extraTimeInKnockout"));
    }
}
