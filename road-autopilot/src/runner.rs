use crate::cases::NamedCase;
use anyhow::{anyhow, Context, Result};
use road_core::{
    format_action_list, replay, search, verify_sequence, Action, GameState, ReplayError,
    ReplayResult, SearchLimits, SearchStats, TurnRecord,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunMetrics {
    pub case: String,
    pub solved: bool,
    pub actions: Vec<Action>,
    pub turns: u32,
    pub road_length: usize,
    pub bike_count: u32,
    pub min_survivors: u32,
    pub initial_alive: u32,
    pub final_alive: u32,
    pub limits: SearchLimits,
    pub stats: SearchStats,
    pub elapsed_ms: f64,
}

impl RunMetrics {
    pub fn action_list(&self) -> String {
        if self.solved {
            format_action_list(&self.actions)
        } else {
            "none".to_string()
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    /// Per-turn trace of the verified solution. Empty when the case is unsolved.
    pub trace: Vec<TurnRecord>,
}

pub fn initial_state(case: &NamedCase) -> Result<GameState> {
    GameState::new(&case.config).with_context(|| format!("case '{}' is malformed", case.name))
}

pub fn solve_case(case: &NamedCase, limits: SearchLimits) -> Result<RunArtifact> {
    let initial = initial_state(case)?;
    tracing::debug!(case = %case.name, %initial, "solving");

    let started = Instant::now();
    let report = search(&initial, limits);
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let solved = report.solution.is_some();
    let (actions, final_alive, trace) = match report.solution {
        Some(solution) => {
            verify_sequence(&initial, &solution.actions, limits).map_err(|err| {
                anyhow!("search produced an invalid sequence for '{}': {err}", case.name)
            })?;
            let trace = replay(&initial, &solution.actions);
            (
                solution.actions,
                solution.final_state.alive_count(),
                trace,
            )
        }
        None => (Vec::new(), 0, Vec::new()),
    };

    let metrics = RunMetrics {
        case: case.name.clone(),
        solved,
        turns: actions.len() as u32,
        actions,
        road_length: initial.road().length(),
        bike_count: initial.total_bikes(),
        min_survivors: initial.min_survivors(),
        initial_alive: initial.alive_count(),
        final_alive,
        limits,
        stats: report.stats,
        elapsed_ms,
    };

    if metrics.solved {
        tracing::info!(
            case = %metrics.case,
            turns = metrics.turns,
            alive = metrics.final_alive,
            nodes = metrics.stats.nodes_visited,
            "case solved"
        );
    } else {
        tracing::warn!(
            case = %metrics.case,
            nodes = metrics.stats.nodes_visited,
            deepest_turn = metrics.stats.deepest_turn,
            "no solution"
        );
    }

    Ok(RunArtifact { metrics, trace })
}

#[derive(Clone, Debug)]
pub struct ReplayArtifact {
    pub trace: Vec<TurnRecord>,
    pub verdict: Result<ReplayResult, ReplayError>,
}

/// Traces `actions` on a case and checks them as a full solution.
pub fn replay_case(
    case: &NamedCase,
    actions: &[Action],
    limits: SearchLimits,
) -> Result<ReplayArtifact> {
    let initial = initial_state(case)?;
    let trace = replay(&initial, actions);
    let verdict = verify_sequence(&initial, actions, limits);
    match &verdict {
        Ok(result) => tracing::info!(case = %case.name, turns = result.turns, "sequence verified"),
        Err(err) => tracing::warn!(case = %case.name, %err, "sequence rejected"),
    }
    Ok(ReplayArtifact { trace, verdict })
}
