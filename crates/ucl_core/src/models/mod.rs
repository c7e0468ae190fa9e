pub mod fixture;
pub mod rules;
pub mod team;

pub use fixture::{Fixture, Outcome};
pub use rules::{rules_schema_json, Rules};
pub use team::{Pot, Team};
