use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seeding tier. Pot 1 holds the strongest clubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Pot {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Pot {
    pub const ALL: [Pot; 4] = [Pot::One, Pot::Two, Pot::Three, Pot::Four];

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Pot {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Pot::One),
            2 => Ok(Pot::Two),
            3 => Ok(Pot::Three),
            4 => Ok(Pot::Four),
            other => Err(ConfigError::InvalidPot(other)),
        }
    }
}

impl From<Pot> for u8 {
    fn from(pot: Pot) -> Self {
        pot.number()
    }
}

impl fmt::Display for Pot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pot {}", self.number())
    }
}

/// A competitor. Immutable once created; the caller owns the roster.
///
/// `logo` is an opaque reference that the core never interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub country: String,
    pub coefficient: f64,
    pub pot: Pot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Team {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
        coefficient: f64,
        pot: Pot,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            country: country.into(),
            coefficient,
            pot,
            logo: None,
        }
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn shares_country_with(&self, other: &Team) -> bool {
        self.country == other.country
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.country)
    }
}
