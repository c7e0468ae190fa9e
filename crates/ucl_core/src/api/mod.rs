pub mod json_api;

pub use json_api::{
    conduct_draw_json, playoff_json, simulate_fixtures_json, standings_json, DrawMode, DrawRequest,
    DrawResponse, PlayoffRequest, PlayoffResponse, RankedEntry, SimulateRequest, SimulateResponse,
    StandingsRequest, StandingsResponse, SCHEMA_VERSION,
};
