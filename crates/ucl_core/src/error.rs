use thiserror::Error;

/// Failures loading or validating tournament configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid rules: {0}")]
    Invalid(String),

    #[error("Invalid pot: {0} (expected 1-4)")]
    InvalidPot(u8),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A draw request that cannot be attempted at all.
///
/// Recoverable problems found while drawing (rule fallbacks, skipped slots)
/// are reported as [`crate::draw::DrawIssue`] entries next to the fixtures
/// instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    #[error("Not enough teams: found {found}, need at least {required}")]
    NotEnoughTeams { found: usize, required: usize },

    #[error("Duplicate team id: {0}")]
    DuplicateTeam(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Fixture not found: {0}")]
    FixtureNotFound(String),

    #[error("Score {home}-{away} out of range (0-{max})")]
    ScoreOutOfRange { home: u8, away: u8, max: u8 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BracketError {
    #[error("Playoff match not found: {0}")]
    MatchNotFound(String),

    #[error("Playoff match {0} is still waiting for its teams")]
    AwaitingTeams(String),

    #[error("Playoff match {0} already has a result")]
    AlreadyPlayed(String),

    #[error("Playoff match {id} cannot end level ({score}-{score})")]
    LevelScore { id: String, score: u8 },
}

/// Umbrella error for the JSON entry points.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unsupported schema version: found {found}, expected {expected}")]
    UnsupportedSchema { found: u8, expected: u8 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Bracket(#[from] BracketError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether the caller can retry with a corrected request.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CoreError::UnsupportedSchema { .. } => false,
            CoreError::Serialization(_) => false,
            CoreError::Config(_)
            | CoreError::Draw(_)
            | CoreError::Schedule(_)
            | CoreError::Bracket(_) => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
