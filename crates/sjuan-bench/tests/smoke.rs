use std::fs;

use sjuan_bench::config::BenchmarkConfig;
use sjuan_bench::tournament::{RunnerError, TournamentRunner};
use tempfile::tempdir;

fn load_config(output_dir: &std::path::Path, agents: &str) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
games:
  seed: 4242
  count: 3
  permutations: 2
agents:
{agents}
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
metrics:
  baseline: "baseline"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("games.jsonl").display(),
        summary = output_dir.join("summary.md").display()
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

const MIXED_AGENTS: &str = r#"  - name: "baseline"
    kind: "heuristic"
  - name: "engine"
    kind: "builtin"
  - name: "chaos"
    kind: "random"
    params:
      seed: 3
  - name: "naive"
    kind: "first_legal""#;

#[test]
fn tournament_smoke_test_writes_rows_and_summary() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), MIXED_AGENTS);
    let outputs = config.resolved_outputs();

    let runner = TournamentRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("tournament completes");

    assert_eq!(summary.games_played, 3);
    assert_eq!(summary.permutations, 2);
    assert_eq!(summary.rows_written, 3 * 2 * 4);
    assert!(summary.telemetry_path.is_none());

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes to JSON"))
        .collect();
    assert_eq!(rows.len(), summary.rows_written);

    for game in rows.chunks(4) {
        let mut positions: Vec<u64> = game
            .iter()
            .map(|row| row["finish_position"].as_u64().expect("position"))
            .collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![1, 2, 3, 4]);
        let winners = game.iter().filter(|row| row["won"] == true).count();
        assert_eq!(winners, 1);
    }

    let engine_rows: Vec<_> = rows.iter().filter(|row| row["agent"] == "engine").collect();
    assert_eq!(engine_rows.len(), 6);
    assert!(engine_rows.iter().all(|row| row["decisions"] == 0));

    let markdown = fs::read_to_string(&summary.summary_path).expect("summary readable");
    assert!(markdown.starts_with("# Tournament Summary"));
    for name in ["baseline", "engine", "chaos", "naive"] {
        assert!(markdown.contains(&format!("| {name} |")), "{name} missing");
    }
}

#[test]
fn identical_seeds_reproduce_identical_finishes() {
    let positions = |dir: &std::path::Path| {
        let config = load_config(dir, MIXED_AGENTS);
        let outputs = config.resolved_outputs();
        let summary = TournamentRunner::new(config, outputs)
            .expect("runner")
            .run()
            .expect("run");
        fs::read_to_string(summary.jsonl_path)
            .expect("jsonl")
            .lines()
            .map(|line| {
                let row: serde_json::Value = serde_json::from_str(line).expect("row");
                (row["agent"].to_string(), row["finish_position"].as_u64())
            })
            .collect::<Vec<_>>()
    };

    let first = tempdir().expect("temp dir");
    let second = tempdir().expect("temp dir");
    assert_eq!(positions(first.path()), positions(second.path()));
}

#[test]
fn conflicting_builtin_policies_are_rejected() {
    let dir = tempdir().expect("temp dir");
    let agents = r#"  - name: "baseline"
    kind: "builtin"
    params:
      policy: "heuristic"
  - name: "other"
    kind: "builtin"
    params:
      policy: "random""#;
    let config = load_config(dir.path(), agents);
    let outputs = config.resolved_outputs();
    assert!(matches!(
        TournamentRunner::new(config, outputs),
        Err(RunnerError::Agent(_))
    ));
}

#[test]
fn too_many_permutations_are_rejected() {
    let dir = tempdir().expect("temp dir");
    let agents = r#"  - name: "baseline"
    kind: "heuristic"
  - name: "naive"
    kind: "first_legal""#;
    let mut config = load_config(dir.path(), agents);
    config.games.permutations = 3;
    let outputs = config.resolved_outputs();
    assert!(matches!(
        TournamentRunner::new(config, outputs),
        Err(RunnerError::PermutationLimit { requested: 3, max: 2 })
    ));
}
