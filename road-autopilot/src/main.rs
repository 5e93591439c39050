use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use road_autopilot::benchmark::{run_benchmark, BenchmarkConfig};
use road_autopilot::cases::{find_case, load_cases, select_cases};
use road_autopilot::config::resolve_limits;
use road_autopilot::runner::{replay_case, solve_case};
use road_autopilot::util::{unix_now_s, write_json};
use road_core::parse_action_list;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "road-autopilot")]
#[command(about = "Finds action sequences that steer a convoy of bikes across a road of potholes")]
struct Cli {
    /// JSON case file to use instead of the built-in cases
    #[arg(long)]
    cases_file: Option<PathBuf>,
    /// Turn bound for the search (env ROAD_MAX_TURN, default 50)
    #[arg(long)]
    max_turn: Option<u32>,
    /// Turns that expand children best-survivors-first (env ROAD_BEST_FIRST_TURNS, default 3)
    #[arg(long)]
    best_first_turns: Option<u32>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available cases
    ListCases,
    /// Search for a winning action sequence on one or more cases
    Solve {
        /// Comma-separated case names; all cases when omitted
        #[arg(long)]
        cases: Option<String>,
        /// Print the per-turn trace of each solution
        #[arg(long, default_value_t = false)]
        trace: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replay an action sequence on a case and verify it as a solution
    Replay {
        #[arg(long)]
        case: String,
        /// Comma-separated actions, e.g. SPEED,JUMP,UP
        #[arg(long)]
        actions: String,
    },
    /// Solve many cases in parallel and write a summary report
    Benchmark {
        #[arg(long)]
        cases: Option<String>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        cases_file,
        max_turn,
        best_first_turns,
        command,
    } = Cli::parse();
    let all_cases = load_cases(cases_file.as_deref())?;
    let limits = resolve_limits(max_turn, best_first_turns);

    match command {
        Commands::ListCases => {
            for case in &all_cases {
                let config = &case.config;
                println!(
                    "{:40} bikes={} min={} speed={} length={}",
                    case.name,
                    config.bike_count,
                    config.min_survivors,
                    config.initial_speed,
                    config.lanes[0].len()
                );
            }
        }
        Commands::Solve {
            cases,
            trace,
            output,
        } => {
            let selected = select_cases(all_cases, cases.as_deref())?;
            let mut runs = Vec::with_capacity(selected.len());
            for case in &selected {
                let artifact = solve_case(case, limits)?;
                let metrics = &artifact.metrics;
                println!("case={}", metrics.case);
                println!("solved={}", metrics.solved);
                println!("actions={}", metrics.action_list());
                println!("turns={}", metrics.turns);
                println!(
                    "alive={}/{} min={}",
                    metrics.final_alive, metrics.bike_count, metrics.min_survivors
                );
                println!("nodes={}", metrics.stats.nodes_visited);
                println!("elapsed_ms={:.3}", metrics.elapsed_ms);
                if trace {
                    for record in &artifact.trace {
                        println!(
                            "  turn={} action={} position={} speed={} alive={} lost={:?} end_of_road={}",
                            record.turn,
                            record.action,
                            record.position,
                            record.speed,
                            record.alive_count,
                            record.lost,
                            record.end_of_road
                        );
                    }
                }
                runs.push(artifact.metrics);
            }
            if let Some(path) = output {
                write_json(&path, &runs)?;
                println!("wrote={}", path.display());
            }
        }
        Commands::Replay { case, actions } => {
            let named = find_case(all_cases, &case)?;
            let actions = parse_action_list(&actions).context("invalid --actions")?;
            let artifact = replay_case(&named, &actions, limits)?;

            for record in &artifact.trace {
                println!(
                    "turn={} action={} position={} speed={} alive={} lost={:?} end_of_road={}",
                    record.turn,
                    record.action,
                    record.position,
                    record.speed,
                    record.alive_count,
                    record.lost,
                    record.end_of_road
                );
            }
            match artifact.verdict {
                Ok(result) => {
                    println!("valid=true");
                    println!("turns={}", result.turns);
                    println!("alive={} min={}", result.alive_count, result.min_survivors);
                }
                Err(err) => {
                    println!("valid=false");
                    println!("reason={err}");
                }
            }
        }
        Commands::Benchmark {
            cases,
            out_dir,
            jobs,
        } => {
            let selected = select_cases(all_cases, cases.as_deref())?;
            let out_dir = out_dir
                .unwrap_or_else(|| PathBuf::from(format!("benchmarks/road-{}", unix_now_s())));

            let report = run_benchmark(BenchmarkConfig {
                cases: selected,
                limits,
                out_dir: out_dir.clone(),
                jobs,
            })?;

            println!("runs={}", report.run_count);
            println!("solved={}", report.solved_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("max_turn={}", report.limits.max_turn);
            println!("best_first_turns={}", report.limits.best_first_turns);
            println!("nodes={}", report.total_nodes_visited);
            println!("out_dir={}", out_dir.display());
            for run in &report.runs {
                println!(
                    "  {:40} solved={} turns={} alive={} nodes={} actions={}",
                    run.case,
                    run.solved,
                    run.turns,
                    run.final_alive,
                    run.stats.nodes_visited,
                    run.action_list()
                );
            }
            if !report.unsolved.is_empty() {
                println!("unsolved={}", report.unsolved.join(","));
            }
        }
    }

    Ok(())
}
