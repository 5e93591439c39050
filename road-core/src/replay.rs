use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::ReplayError;
use crate::search::{valid_actions, SearchLimits};
use crate::state::GameState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub action: Action,
    pub position: usize,
    pub speed: u32,
    pub alive_count: u32,
    pub lost: Vec<u32>,
    pub end_of_road: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayResult {
    pub turns: u32,
    pub final_position: usize,
    pub final_speed: u32,
    pub alive_count: u32,
    pub min_survivors: u32,
}

/// Plays `actions` from `initial` and records every turn. Actions after the end of the
/// road are ignored; nothing is checked for legality.
pub fn replay(initial: &GameState, actions: &[Action]) -> Vec<TurnRecord> {
    let mut state = initial.clone();
    let mut records = Vec::with_capacity(actions.len());

    for &action in actions {
        if state.end_of_road() {
            break;
        }
        let before = state.clone();
        state.step(action);

        let lost = before
            .bikes()
            .iter()
            .zip(state.bikes())
            .filter(|(was, now)| was.alive && !now.alive)
            .map(|(was, _)| was.id)
            .collect();

        records.push(TurnRecord {
            turn: state.turn(),
            action,
            position: state.position(),
            speed: state.speed(),
            alive_count: state.alive_count(),
            lost,
            end_of_road: state.end_of_road(),
        });
    }

    records
}

/// Strict replay: accepts `actions` only if the search itself could have produced them.
pub fn verify_sequence(
    initial: &GameState,
    actions: &[Action],
    limits: SearchLimits,
) -> Result<ReplayResult, ReplayError> {
    let mut state = initial.clone();
    check_turn(&state, limits)?;

    for &action in actions {
        if state.end_of_road() {
            return Err(ReplayError::ActionAfterEndOfRoad { turn: state.turn() });
        }
        if !valid_actions(&state).contains(&action) {
            return Err(ReplayError::IllegalAction {
                turn: state.turn(),
                action,
            });
        }
        state.step(action);
        check_turn(&state, limits)?;
    }

    if !state.end_of_road() {
        return Err(ReplayError::RoadNotFinished {
            turns: state.turn(),
            position: state.position(),
        });
    }

    Ok(ReplayResult {
        turns: state.turn(),
        final_position: state.position(),
        final_speed: state.speed(),
        alive_count: state.alive_count(),
        min_survivors: state.min_survivors(),
    })
}

fn check_turn(state: &GameState, limits: SearchLimits) -> Result<(), ReplayError> {
    state.validate().map_err(|rule| ReplayError::InvalidState {
        turn: state.turn(),
        rule,
    })?;

    if !state.meets_survivor_bound() {
        return Err(ReplayError::SurvivorsBelowMinimum {
            turn: state.turn(),
            alive: state.alive_count(),
            min: state.min_survivors(),
        });
    }

    if state.turn() > limits.max_turn {
        return Err(ReplayError::TurnLimitExceeded {
            turn: state.turn(),
            max_turn: limits.max_turn,
        });
    }

    Ok(())
}
