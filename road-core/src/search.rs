use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::constants::{DEFAULT_BEST_FIRST_TURNS, DEFAULT_MAX_TURN, SLOW_MIN_SPEED};
use crate::state::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// States whose turn exceeds this are abandoned.
    pub max_turn: u32,
    /// Turns below this expand every child first and visit the best survivors first.
    pub best_first_turns: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_turn: DEFAULT_MAX_TURN,
            best_first_turns: DEFAULT_BEST_FIRST_TURNS,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub nodes_visited: u64,
    pub states_simulated: u64,
    pub backtracks: u64,
    pub deepest_turn: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub actions: Vec<Action>,
    pub final_state: GameState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub solution: Option<Solution>,
    pub stats: SearchStats,
}

/// Actions worth trying from `state`, in the order the depth-first pass tries them.
///
/// `WAIT` is never offered: it behaves like `JUMP` whenever the landing cell is clear.
pub fn valid_actions(state: &GameState) -> Vec<Action> {
    let mut actions = Vec::with_capacity(5);
    actions.push(Action::Speed);
    actions.push(Action::Jump);
    if state.speed() > SLOW_MIN_SPEED {
        actions.push(Action::Slow);
    }
    if !state.bottom_lane_occupied() {
        actions.push(Action::Down);
    }
    if !state.top_lane_occupied() {
        actions.push(Action::Up);
    }
    actions
}

/// Runs the search with default limits and returns the winning actions, or `None`.
pub fn find_valid_sequence(initial: &GameState) -> Option<Vec<Action>> {
    search(initial, SearchLimits::default())
        .solution
        .map(|solution| solution.actions)
}

pub fn search(initial: &GameState, limits: SearchLimits) -> SearchReport {
    let mut searcher = Searcher {
        limits,
        stats: SearchStats::default(),
        trail: Vec::new(),
    };
    let final_state = searcher.backtrack(initial);
    let solution = final_state.map(|final_state| Solution {
        actions: searcher.trail,
        final_state,
    });

    SearchReport {
        solution,
        stats: searcher.stats,
    }
}

struct Searcher {
    limits: SearchLimits,
    stats: SearchStats,
    // Actions from the root to the node being expanded; every push is popped on failure.
    trail: Vec<Action>,
}

impl Searcher {
    fn backtrack(&mut self, state: &GameState) -> Option<GameState> {
        self.stats.nodes_visited += 1;
        self.stats.deepest_turn = self.stats.deepest_turn.max(state.turn());

        if !state.meets_survivor_bound() || state.turn() > self.limits.max_turn {
            return None;
        }
        if state.end_of_road() {
            return Some(state.clone());
        }

        if state.turn() < self.limits.best_first_turns {
            self.expand_best_first(state)
        } else {
            self.expand_in_order(state)
        }
    }

    fn expand_best_first(&mut self, state: &GameState) -> Option<GameState> {
        let mut children: Vec<(Action, GameState)> = valid_actions(state)
            .into_iter()
            .map(|action| (action, state.apply_action(action)))
            .collect();
        self.stats.states_simulated += children.len() as u64;

        // Stable, so equal survivor counts keep generation order.
        children.sort_by(|a, b| b.1.alive_count().cmp(&a.1.alive_count()));

        for (action, child) in children {
            if let Some(found) = self.visit(action, &child) {
                return Some(found);
            }
        }
        None
    }

    fn expand_in_order(&mut self, state: &GameState) -> Option<GameState> {
        for action in valid_actions(state) {
            let child = state.apply_action(action);
            self.stats.states_simulated += 1;
            if let Some(found) = self.visit(action, &child) {
                return Some(found);
            }
        }
        None
    }

    fn visit(&mut self, action: Action, child: &GameState) -> Option<GameState> {
        self.trail.push(action);
        let found = self.backtrack(child);
        if found.is_none() {
            self.trail.pop();
            self.stats.backtracks += 1;
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BikeSpec, CaseConfig};
    use crate::replay::verify_sequence;
    use alloc::{collections::BTreeMap, string::String};

    fn state_with(lanes: [&str; 4], bike_lanes: &[u8], speed: u32, min: u32) -> GameState {
        let bikes: BTreeMap<u32, BikeSpec> = bike_lanes
            .iter()
            .enumerate()
            .map(|(id, &lane)| (id as u32, BikeSpec { lane, alive: true }))
            .collect();
        GameState::new(&CaseConfig {
            bike_count: bikes.len() as u32,
            min_survivors: min,
            initial_speed: speed,
            lanes: lanes.map(String::from),
            bikes,
        })
        .expect("test config must be valid")
    }

    const OPEN30: &str = "..............................";

    #[test]
    fn valid_actions_always_offer_speed_and_jump_first() {
        let full = state_with([OPEN30, OPEN30, OPEN30, OPEN30], &[0, 1, 2, 3], 1, 1);
        assert_eq!(valid_actions(&full), [Action::Speed, Action::Jump]);
    }

    #[test]
    fn valid_actions_offer_slow_only_above_two() {
        let slow = state_with([OPEN30, OPEN30, OPEN30, OPEN30], &[0, 3], 2, 1);
        assert!(!valid_actions(&slow).contains(&Action::Slow));
        let fast = state_with([OPEN30, OPEN30, OPEN30, OPEN30], &[0, 3], 3, 1);
        assert_eq!(
            valid_actions(&fast),
            [Action::Speed, Action::Jump, Action::Slow]
        );
    }

    #[test]
    fn valid_actions_follow_lane_occupancy() {
        let middle = state_with([OPEN30, OPEN30, OPEN30, OPEN30], &[1, 2], 4, 1);
        assert_eq!(
            valid_actions(&middle),
            [
                Action::Speed,
                Action::Jump,
                Action::Slow,
                Action::Down,
                Action::Up
            ]
        );
        let top = state_with([OPEN30, OPEN30, OPEN30, OPEN30], &[0], 1, 1);
        assert_eq!(valid_actions(&top), [Action::Speed, Action::Jump, Action::Down]);
    }

    #[test]
    fn valid_actions_never_offer_wait() {
        let state = state_with([OPEN30, OPEN30, OPEN30, OPEN30], &[1], 9, 1);
        assert!(!valid_actions(&state).contains(&Action::Wait));
    }

    #[test]
    fn clear_road_is_solved_by_speeding() {
        let state = state_with([OPEN30, OPEN30, OPEN30, OPEN30], &[0, 1, 2, 3], 1, 4);
        let actions = find_valid_sequence(&state).expect("clear road must be solvable");
        assert!(actions.iter().all(|action| *action == Action::Speed));
        assert!(verify_sequence(&state, &actions, SearchLimits::default()).is_ok());
    }

    #[test]
    fn single_pit_single_bike_is_solved() {
        let state = state_with(
            [OPEN30, OPEN30, "...........0..................", OPEN30],
            &[2],
            1,
            1,
        );
        let report = search(&state, SearchLimits::default());
        let solution = report.solution.expect("one pit must be avoidable");
        assert!(!solution.actions.is_empty());
        assert!(solution.final_state.end_of_road());
        assert_eq!(solution.final_state.alive_count(), 1);
        assert_eq!(
            solution.final_state.turn() as usize,
            solution.actions.len()
        );
        assert!(report.stats.nodes_visited > solution.actions.len() as u64);
    }

    #[test]
    fn unavoidable_pits_return_no_solution() {
        let wall = ".00000000000000000000000000000";
        let state = state_with([wall, OPEN30, OPEN30, OPEN30], &[0, 1, 2, 3], 1, 4);
        let report = search(&state, SearchLimits::default());
        assert!(report.solution.is_none());
        assert_eq!(report.stats.states_simulated, 2);
        assert_eq!(find_valid_sequence(&state), None);
    }

    #[test]
    fn turn_limit_prunes_long_roads() {
        let state = state_with([OPEN30, OPEN30, OPEN30, OPEN30], &[0], 1, 1);
        let tight = SearchLimits {
            max_turn: 2,
            best_first_turns: 3,
        };
        assert!(search(&state, tight).solution.is_none());
    }

    #[test]
    fn already_finished_state_yields_empty_sequence() {
        let mut state = state_with(["....", "....", "....", "...."], &[1], 9, 1);
        state.step(Action::Speed);
        assert!(state.end_of_road());
        let report = search(&state, SearchLimits::default());
        let solution = report.solution.expect("finished state is a solution");
        assert!(solution.actions.is_empty());
    }

    #[test]
    fn below_survivor_bound_fails_immediately() {
        let mut state = state_with(["0...", "....", "....", "...."], &[0, 1], 1, 2);
        state.step(Action::Wait);
        assert_eq!(state.alive_count(), 1);
        let report = search(&state, SearchLimits::default());
        assert!(report.solution.is_none());
        assert_eq!(report.stats.nodes_visited, 1);
    }

    #[test]
    fn best_first_prefers_surviving_children() {
        // SPEED, JUMP and UP each lose the lane-1 bike on the first turn; DOWN keeps both.
        // One survivor is enough, so every child is an acceptable branch.
        let state = state_with(
            [OPEN30, "..0...........................", OPEN30, OPEN30],
            &[1, 2],
            2,
            1,
        );

        let report = search(&state, SearchLimits::default());
        let solution = report.solution.expect("lane change avoids the pit");
        assert_eq!(solution.actions[0], Action::Down);
        assert_eq!(solution.final_state.alive_count(), 2);

        let depth_first = SearchLimits {
            best_first_turns: 0,
            ..SearchLimits::default()
        };
        let report = search(&state, depth_first);
        let solution = report.solution.expect("speeding through still keeps one bike");
        assert_eq!(solution.actions[0], Action::Speed);
        assert_eq!(solution.final_state.alive_count(), 1);
    }

    #[test]
    fn best_first_keeps_generation_order_on_ties() {
        // SPEED loses the lane-1 bike at index 3; JUMP, DOWN and UP all keep both.
        let state = state_with(
            [OPEN30, "...0..........................", OPEN30, OPEN30],
            &[1, 2],
            2,
            1,
        );
        for action in [Action::Jump, Action::Down, Action::Up] {
            assert_eq!(state.apply_action(action).alive_count(), 2);
        }
        assert_eq!(state.apply_action(Action::Speed).alive_count(), 1);

        let report = search(&state, SearchLimits::default());
        let solution = report.solution.expect("jumping clears the pit");
        assert_eq!(solution.actions[0], Action::Jump);
        assert_eq!(solution.final_state.alive_count(), 2);
    }
}
