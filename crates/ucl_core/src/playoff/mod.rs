//! Knockout playoff bracket
//!
//! The sixteen clubs in the playoff tier play a single-elimination bracket.
//! Matches live in one arena ([`PlayoffBracket`]) and point at the match
//! their winner moves on to by id.

pub mod advance;
pub mod bracket;

pub use advance::BracketOutcome;
pub use bracket::{build_playoff_bracket, PlayoffBracket, PlayoffMatch, PlayoffRound, BRACKET_SIZE};
