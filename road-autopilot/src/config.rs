use road_core::constants::{DEFAULT_BEST_FIRST_TURNS, DEFAULT_MAX_TURN};
use road_core::SearchLimits;
use std::env;

pub const MAX_TURN_ENV: &str = "ROAD_MAX_TURN";
pub const BEST_FIRST_TURNS_ENV: &str = "ROAD_BEST_FIRST_TURNS";

/// CLI values win over the environment, which wins over the defaults.
pub fn resolve_limits(max_turn: Option<u32>, best_first_turns: Option<u32>) -> SearchLimits {
    SearchLimits {
        max_turn: max_turn.unwrap_or_else(|| read_env_u32(MAX_TURN_ENV, DEFAULT_MAX_TURN)),
        best_first_turns: best_first_turns
            .unwrap_or_else(|| read_env_u32(BEST_FIRST_TURNS_ENV, DEFAULT_BEST_FIRST_TURNS)),
    }
}

pub fn read_env_u32(name: &str, default: u32) -> u32 {
    let Ok(raw) = env::var(name) else {
        return default;
    };
    match raw.trim().parse::<u32>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("{name}={raw:?} is not a valid u32. Falling back to {default}.");
            default
        }
    }
}
