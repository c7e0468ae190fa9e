//! Data compiled into the binary.

pub mod embedded;

pub use embedded::{default_teams, DEFAULT_TEAMS_JSON};
