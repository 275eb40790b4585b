use std::path::PathBuf;

use clap::Parser;

use sjuan_bench::config::{BenchmarkConfig, ResolvedOutputs};
use sjuan_bench::logging::init_logging;
use sjuan_bench::tournament::TournamentRunner;

/// Self-play benchmarking harness for Sjuan agents.
#[derive(Debug, Parser)]
#[command(
    name = "sjuan-bench",
    author,
    version,
    about = "Deterministic Sjuan tournament harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to deal.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for per-game seeds.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the number of seat permutations per game.
    #[arg(long, value_name = "COUNT")]
    permutations: Option<usize>,

    /// Exit after validating the configuration (no tournament is run).
    #[arg(long)]
    validate_only: bool,

    /// Log the heuristic's per-decision scoring regardless of config (forces SJUAN_DECISION_DETAILS=1).
    #[arg(long)]
    log_decisions: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    if let Some(permutations) = cli.permutations {
        config.games.permutations = permutations;
    }

    if cli.log_decisions {
        config.logging.decision_details = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let agent_count = config.agents.len();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let permutations = config.games.permutations;

    println!(
        "Loaded configuration '{run_id}' with {agent_count} agents ({games} games, {permutations} permutations)"
    );

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = TournamentRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: tournament execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Tournament complete for '{run_id}': {} games × {} permutations → {} rows at {}",
        summary.games_played,
        summary.permutations,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
