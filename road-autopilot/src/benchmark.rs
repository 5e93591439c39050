use crate::cases::NamedCase;
use crate::runner::{solve_case, RunMetrics};
use crate::util::{unix_now_s, write_json};
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use road_core::SearchLimits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub cases: Vec<NamedCase>,
    pub limits: SearchLimits,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub limits: SearchLimits,
    pub jobs: Option<usize>,
    pub run_count: usize,
    pub solved_count: usize,
    pub unsolved: Vec<String>,
    pub total_nodes_visited: u64,
    pub total_states_simulated: u64,
    pub total_backtracks: u64,
    pub total_elapsed_ms: f64,
    /// In the order the cases were given.
    pub runs: Vec<RunMetrics>,
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.cases.is_empty() {
        return Err(anyhow!("benchmark requires at least one case"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    tracing::info!(
        cases = config.cases.len(),
        jobs = ?config.jobs,
        out_dir = %config.out_dir.display(),
        "benchmark started"
    );

    let limits = config.limits;
    let run_one = |case: &NamedCase| -> Result<RunMetrics> {
        let artifact = solve_case(case, limits)
            .with_context(|| format!("benchmark run failed for case={}", case.name))?;
        Ok(artifact.metrics)
    };

    let run_results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| config.cases.par_iter().map(run_one).collect())
    } else {
        config.cases.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(run_results.len());
    for result in run_results {
        runs.push(result?);
    }

    let unsolved: Vec<String> = runs
        .iter()
        .filter(|run| !run.solved)
        .map(|run| run.case.clone())
        .collect();

    let report = BenchmarkReport {
        generated_unix_s: unix_now_s(),
        limits,
        jobs: config.jobs,
        run_count: runs.len(),
        solved_count: runs.len() - unsolved.len(),
        unsolved,
        total_nodes_visited: runs.iter().map(|run| run.stats.nodes_visited).sum(),
        total_states_simulated: runs.iter().map(|run| run.stats.states_simulated).sum(),
        total_backtracks: runs.iter().map(|run| run.stats.backtracks).sum(),
        total_elapsed_ms: runs.iter().map(|run| run.elapsed_ms).sum(),
        runs,
    };

    write_runs_csv(&config.out_dir.join("runs.csv"), &report.runs)?;
    write_json(&config.out_dir.join("summary.json"), &report)
        .context("failed to write benchmark summary")?;

    tracing::info!(
        solved = report.solved_count,
        runs = report.run_count,
        "benchmark finished"
    );
    Ok(report)
}

fn write_runs_csv(path: &Path, rows: &[RunMetrics]) -> Result<()> {
    let mut csv = String::from(
        "case,solved,turns,final_alive,min_survivors,bike_count,nodes_visited,states_simulated,backtracks,deepest_turn,elapsed_ms,actions\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{:.3},\"{}\"\n",
            row.case,
            row.solved,
            row.turns,
            row.final_alive,
            row.min_survivors,
            row.bike_count,
            row.stats.nodes_visited,
            row.stats.states_simulated,
            row.stats.backtracks,
            row.stats.deepest_turn,
            row.elapsed_ms,
            row.action_list()
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
