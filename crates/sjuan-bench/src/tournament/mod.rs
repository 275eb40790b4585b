mod permutations;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use sjuan_core::GameError;
use sjuan_core::game::{Game, MAX_PLAYERS, MIN_PLAYERS};
use sjuan_core::model::player::{PlayerInfo, PlayerKind};
use sjuan_core::policy::{Policy, PolicyContext, PolicyKind};
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AgentConfig, AgentKind, BenchmarkConfig, ResolvedOutputs};

pub use permutations::{SeatPermutations, max_permutations};

const MAX_SEAT_PERMUTATIONS: usize = 24;

/// Plays seeded games between the configured agents.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    builtin_policy: PolicyKind,
    seat_permutations: SeatPermutations,
    logging_enabled: bool,
}

pub struct RunSummary {
    pub games_played: usize,
    pub permutations: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&agents.len()) {
            return Err(RunnerError::SeatCount {
                found: agents.len(),
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }

        let max = MAX_SEAT_PERMUTATIONS.min(max_permutations(agents.len()));
        if config.games.permutations > max {
            return Err(RunnerError::PermutationLimit {
                requested: config.games.permutations,
                max,
            });
        }

        let builtin_policy = shared_builtin_policy(&agents)?;
        let seat_permutations = SeatPermutations::new(agents.len(), config.games.permutations);

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
            builtin_policy,
            seat_permutations,
        })
    }

    /// Execute the tournament, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let permutations = self.seat_permutations.as_slice();
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut analytics = AnalyticsCollector::new(&self.config)?;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();

            for (perm_index, perm) in permutations.iter().enumerate() {
                let outcome = self.play_game(game_index, perm_index, game_seed, perm)?;
                analytics.record_game(game_index, perm_index, &outcome)?;
                rows_written += write_game_rows(
                    &mut writer,
                    &self.config,
                    game_index,
                    perm_index,
                    game_seed,
                    &outcome,
                )?;
            }
        }

        writer.flush()?;

        let summary = analytics.finalize()?;
        summary.write_markdown(&self.outputs.summary_md)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| self.outputs.summary_dir().join("telemetry.jsonl"));

        Ok(RunSummary {
            games_played: self.config.games.count,
            permutations: permutations.len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    fn play_game(
        &self,
        game_index: usize,
        permutation_index: usize,
        game_seed: u64,
        permutation: &[usize],
    ) -> Result<GameOutcome, RunnerError> {
        let game_id = game_id(game_index, permutation_index);
        let mut seats = build_seat_states(permutation, &self.agents, game_seed)?;
        let roster = seats
            .iter()
            .map(|seat| PlayerInfo::new(seat.agent_name.clone(), seat.kind))
            .collect();

        let mut game = Game::with_seed(roster, game_seed)?
            .with_policy(self.builtin_policy.spawn(game_seed));
        game.start()?;

        let mut actions = 0usize;
        while let Some(turn) = game.current_turn() {
            actions += 1;
            if actions > self.config.metrics.max_actions_per_game {
                return Err(RunnerError::Stalled {
                    game_id,
                    actions: self.config.metrics.max_actions_per_game,
                });
            }

            let seat_index = turn.player();
            let seat = &mut seats[seat_index];
            let board = game.board_snapshot();
            let ctx = PolicyContext {
                board: &board,
                turn,
            };
            let policy = seat
                .policy
                .as_mut()
                .ok_or_else(|| RunnerError::UnexpectedTurn {
                    agent: seat.agent_name.clone(),
                })?;

            let start = Instant::now();
            let action = policy.choose_action(&ctx)?;
            let elapsed_ms = seat.metrics.record(start.elapsed());

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "sjuan_bench::play",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    game_index = game_index as u32,
                    permutation_index = permutation_index as u32,
                    seat = seat_index as u32,
                    agent = %seat.agent_name,
                    action = %action,
                    elapsed_ms
                );
            }

            game.execute(action)?;
        }

        let seating = seats
            .iter()
            .enumerate()
            .map(|(seat, state)| SeatSnapshot {
                seat,
                agent: state.agent_name.clone(),
            })
            .collect();

        let mut seat_results = Vec::with_capacity(seats.len());
        for (seat, state) in seats.into_iter().enumerate() {
            let finish_position = game.finish_position(seat).ok_or_else(|| {
                RunnerError::Unfinished {
                    game_id: game_id.clone(),
                    seat,
                }
            })?;
            seat_results.push(SeatResult {
                agent_name: state.agent_name,
                seat,
                finish_position,
                metrics: state.metrics.finalize(),
            });
        }

        Ok(GameOutcome {
            seating,
            seat_results,
            actions,
        })
    }
}

/// Every `builtin` seat is resolved by the one policy the engine holds.
fn shared_builtin_policy(agents: &[AgentBlueprint]) -> Result<PolicyKind, AgentError> {
    let mut chosen: Option<(&str, PolicyKind)> = None;
    for agent in agents {
        let AgentImplementation::Builtin(kind) = agent.implementation else {
            continue;
        };
        match chosen {
            Some((first, existing)) if existing != kind => {
                return Err(AgentError::ConflictingBuiltin {
                    first: first.to_string(),
                    second: agent.name.clone(),
                });
            }
            Some(_) => {}
            None => chosen = Some((agent.name.as_str(), kind)),
        }
    }
    Ok(chosen.map(|(_, kind)| kind).unwrap_or_default())
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn game_id(game_index: usize, permutation_index: usize) -> String {
    format!("G{game_index:05}_P{permutation_index:02}")
}

fn write_game_rows(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    game_index: usize,
    permutation_index: usize,
    game_seed: u64,
    outcome: &GameOutcome,
) -> Result<usize, RunnerError> {
    let game_id = game_id(game_index, permutation_index);

    let mut rows_written = 0usize;
    for seat_result in &outcome.seat_results {
        let row = GameLogRow {
            run_id: config.run_id.clone(),
            game_id: game_id.clone(),
            game_index,
            permutation_index,
            game_seed,
            seat: seat_result.seat,
            agent: seat_result.agent_name.clone(),
            seating: outcome.seating.clone(),
            finish_position: seat_result.finish_position,
            won: seat_result.finish_position == 1,
            actions: outcome.actions,
            speed_ms_turn: seat_result.metrics.avg_ms_per_decision,
            decisions: seat_result.metrics.decisions,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

fn build_seat_states(
    permutation: &[usize],
    agents: &[AgentBlueprint],
    game_seed: u64,
) -> Result<Vec<SeatState>, RunnerError> {
    let mut seats = Vec::with_capacity(permutation.len());
    for (seat_idx, agent_idx) in permutation.iter().enumerate() {
        let agent = agents
            .get(*agent_idx)
            .ok_or(RunnerError::InvalidPermutation {
                index: seat_idx,
                agent_index: *agent_idx,
            })?;
        seats.push(SeatState::new(agent, game_seed ^ seat_idx as u64));
    }
    Ok(seats)
}

struct SeatState {
    agent_name: String,
    kind: PlayerKind,
    /// `None` for builtin seats, which the engine resolves itself.
    policy: Option<Box<dyn Policy>>,
    metrics: DecisionMetrics,
}

impl SeatState {
    fn new(agent: &AgentBlueprint, seed: u64) -> Self {
        Self {
            agent_name: agent.name.clone(),
            kind: agent.player_kind(),
            policy: agent.spawn_policy(seed),
            metrics: DecisionMetrics::default(),
        }
    }
}

pub struct GameOutcome {
    pub seating: Vec<SeatSnapshot>,
    pub seat_results: Vec<SeatResult>,
    /// Actions taken by harness-driven seats.
    pub actions: usize,
}

#[derive(Clone, Serialize)]
pub struct SeatSnapshot {
    pub seat: usize,
    pub agent: String,
}

pub struct SeatResult {
    pub agent_name: String,
    pub seat: usize,
    /// 1-based.
    pub finish_position: usize,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Clone)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    permutation_index: usize,
    game_seed: u64,
    seat: usize,
    agent: String,
    seating: Vec<SeatSnapshot>,
    finish_position: usize,
    won: bool,
    actions: usize,
    speed_ms_turn: f64,
    decisions: u32,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {0}")]
    Game(#[from] GameError),
    #[error("configuration requires between {min} and {max} agents but found {found}")]
    SeatCount { found: usize, min: usize, max: usize },
    #[error("requested {requested} seat permutations exceeds maximum of {max}")]
    PermutationLimit { requested: usize, max: usize },
    #[error("permutation index {index} references invalid agent index {agent_index}")]
    InvalidPermutation { index: usize, agent_index: usize },
    #[error("game {game_id} stalled after {actions} actions")]
    Stalled { game_id: String, actions: usize },
    #[error("game {game_id} ended without seat {seat} finishing")]
    Unfinished { game_id: String, seat: usize },
    #[error("engine handed a turn to builtin agent '{agent}'")]
    UnexpectedTurn { agent: String },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid parameter for agent '{name}': {message}")]
    InvalidParam { name: String, message: String },
    #[error("builtin agents '{first}' and '{second}' request different engine policies")]
    ConflictingBuiltin { first: String, second: String },
}

struct AgentBlueprint {
    name: String,
    implementation: AgentImplementation,
}

enum AgentImplementation {
    Builtin(PolicyKind),
    Harness { policy: PolicyKind, seed: Option<u64> },
}

impl AgentBlueprint {
    fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let params = AgentParams::from_value(&config.name, &config.params)?;
        let implementation = match config.kind {
            AgentKind::Builtin => {
                AgentImplementation::Builtin(params.policy.unwrap_or(PolicyKind::Heuristic))
            }
            AgentKind::Heuristic => AgentImplementation::Harness {
                policy: PolicyKind::Heuristic,
                seed: None,
            },
            AgentKind::Random => AgentImplementation::Harness {
                policy: PolicyKind::Random,
                seed: params.seed,
            },
            AgentKind::FirstLegal => AgentImplementation::Harness {
                policy: PolicyKind::FirstLegal,
                seed: None,
            },
        };

        Ok(Self {
            name: config.name.clone(),
            implementation,
        })
    }

    fn player_kind(&self) -> PlayerKind {
        match self.implementation {
            AgentImplementation::Builtin(_) => PlayerKind::Ai,
            AgentImplementation::Harness { .. } => PlayerKind::Agent,
        }
    }

    fn spawn_policy(&self, game_seed: u64) -> Option<Box<dyn Policy>> {
        match self.implementation {
            AgentImplementation::Builtin(_) => None,
            AgentImplementation::Harness { policy, seed } => {
                Some(policy.spawn(seed.map_or(game_seed, |seed| seed ^ game_seed)))
            }
        }
    }
}

#[derive(Default)]
struct AgentParams {
    policy: Option<PolicyKind>,
    seed: Option<u64>,
}

impl AgentParams {
    fn from_value(name: &str, params: &serde_yaml::Value) -> Result<Self, AgentError> {
        if params.is_null() {
            return Ok(Self::default());
        }

        let invalid = |message: String| AgentError::InvalidParam {
            name: name.to_string(),
            message,
        };

        let mapping = params
            .as_mapping()
            .ok_or_else(|| invalid("expected mapping for agent params".to_string()))?;

        let mut parsed = Self::default();
        for (key, value) in mapping {
            match key.as_str() {
                Some("policy") => {
                    let text = value
                        .as_str()
                        .ok_or_else(|| invalid("policy must be a string".to_string()))?;
                    parsed.policy = Some(text.parse().map_err(invalid)?);
                }
                Some("seed") => {
                    parsed.seed = Some(
                        value
                            .as_u64()
                            .ok_or_else(|| invalid("seed must be an unsigned integer".to_string()))?,
                    );
                }
                _ => {}
            }
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, serde_yaml::Value)]) -> serde_yaml::Value {
        serde_yaml::Value::Mapping(
            pairs
                .iter()
                .map(|(key, value)| (serde_yaml::Value::String((*key).into()), value.clone()))
                .collect(),
        )
    }

    fn agent(name: &str, kind: AgentKind, params: serde_yaml::Value) -> AgentConfig {
        AgentConfig {
            name: name.to_string(),
            kind,
            params,
        }
    }

    #[test]
    fn builtin_params_select_engine_policy() {
        let params = mapping(&[("policy", serde_yaml::Value::String("random".into()))]);
        let blueprint = AgentBlueprint::from_config(&agent("bot", AgentKind::Builtin, params))
            .unwrap();
        assert!(matches!(
            blueprint.implementation,
            AgentImplementation::Builtin(PolicyKind::Random)
        ));
        assert_eq!(blueprint.player_kind(), PlayerKind::Ai);
        assert!(blueprint.spawn_policy(1).is_none());
    }

    #[test]
    fn harness_agents_are_seated_as_agents() {
        let params = serde_yaml::Value::Mapping(Default::default());
        let blueprint =
            AgentBlueprint::from_config(&agent("easy", AgentKind::FirstLegal, params)).unwrap();
        assert_eq!(blueprint.player_kind(), PlayerKind::Agent);
        assert!(blueprint.spawn_policy(1).is_some());
    }

    #[test]
    fn unknown_policy_param_is_rejected() {
        let params = mapping(&[("policy", serde_yaml::Value::String("psychic".into()))]);
        let err = AgentBlueprint::from_config(&agent("bot", AgentKind::Builtin, params))
            .err()
            .unwrap();
        assert!(matches!(err, AgentError::InvalidParam { .. }));
    }

    #[test]
    fn conflicting_builtin_policies_are_rejected() {
        let agents = AgentBlueprint::from_configs(&[
            agent(
                "a",
                AgentKind::Builtin,
                mapping(&[("policy", serde_yaml::Value::String("heuristic".into()))]),
            ),
            agent(
                "b",
                AgentKind::Builtin,
                mapping(&[("policy", serde_yaml::Value::String("first_legal".into()))]),
            ),
        ])
        .unwrap();
        assert!(matches!(
            shared_builtin_policy(&agents),
            Err(AgentError::ConflictingBuiltin { .. })
        ));
    }

    #[test]
    fn game_ids_are_zero_padded() {
        assert_eq!(game_id(3, 1), "G00003_P01");
    }
}
