use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_SEAT_PERMUTATIONS: usize = 6;
const DEFAULT_LATENCY_BUDGET_MS: u64 = 50;
const DEFAULT_MAX_ACTIONS: usize = 10_000;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root benchmark configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub games: GamesConfig,
    pub agents: Vec<AgentConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.games.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.metrics.validate(&self.agents)?;
        self.logging.normalize();
        validate_agents(&mut self.agents)?;
        Ok(())
    }

    /// Resolve `{run_id}` placeholders into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub seed: Option<u64>,
    pub count: usize,
    #[serde(default = "default_permutations")]
    pub permutations: usize,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidField {
                field: "games.count".to_string(),
                message: "number of games must be greater than zero".to_string(),
            });
        }

        if self.permutations == 0 {
            return Err(ValidationError::InvalidField {
                field: "games.permutations".to_string(),
                message: "permutations must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn default_permutations() -> usize {
    DEFAULT_SEAT_PERMUTATIONS
}

/// One seat's worth of participant.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub kind: AgentKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Seated as an engine-resolved AI player.
    Builtin,
    Heuristic,
    Random,
    FirstLegal,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MetricsConfig {
    #[serde(default)]
    pub baseline: Option<String>,
    #[serde(default = "default_latency_budget_ms")]
    pub latency_budget_ms: u64,
    /// Actions after which a game counts as stalled.
    #[serde(default = "default_max_actions")]
    pub max_actions_per_game: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            baseline: None,
            latency_budget_ms: DEFAULT_LATENCY_BUDGET_MS,
            max_actions_per_game: DEFAULT_MAX_ACTIONS,
        }
    }
}

impl MetricsConfig {
    fn validate(&self, agents: &[AgentConfig]) -> Result<(), ValidationError> {
        let Some(baseline) = self.baseline.as_ref() else {
            return Err(ValidationError::InvalidField {
                field: "metrics.baseline".to_string(),
                message: "baseline agent must be specified".to_string(),
            });
        };

        if !agents.iter().any(|a| &a.name == baseline) {
            return Err(ValidationError::InvalidField {
                field: "metrics.baseline".to_string(),
                message: format!("baseline agent '{baseline}' is not defined in agents list"),
            });
        }

        if self.latency_budget_ms == 0 {
            return Err(ValidationError::InvalidField {
                field: "metrics.latency_budget_ms".to_string(),
                message: "latency budget must be greater than zero".to_string(),
            });
        }

        if self.max_actions_per_game == 0 {
            return Err(ValidationError::InvalidField {
                field: "metrics.max_actions_per_game".to_string(),
                message: "action cap must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

fn default_latency_budget_ms() -> u64 {
    DEFAULT_LATENCY_BUDGET_MS
}

fn default_max_actions() -> usize {
    DEFAULT_MAX_ACTIONS
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    /// Emit the heuristic policy's per-decision scoring events.
    #[serde(default)]
    pub decision_details: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            decision_details: false,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_agents(agents: &mut [AgentConfig]) -> Result<(), ValidationError> {
    if agents.len() < 2 {
        return Err(ValidationError::InvalidField {
            field: "agents".to_string(),
            message: "at least two agents must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for agent in agents.iter_mut() {
        if agent.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "agents.name".to_string(),
                message: "agent name must not be empty".to_string(),
            });
        }

        if !agent.name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
            return Err(ValidationError::InvalidField {
                field: format!("agents[{}].name", agent.name),
                message: "agent name contains invalid characters".to_string(),
            });
        }

        if !seen.insert(agent.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "agents".to_string(),
                message: format!("agent name '{}' defined more than once", agent.name),
            });
        }

        if agent.params.is_null() {
            agent.params = serde_yaml::Value::Mapping(Default::default());
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Directory holding the summary; telemetry lands next to it.
    pub fn summary_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "sevens_smoke"
games:
  seed: 123
  count: 16
agents:
  - name: "engine"
    kind: "builtin"
  - name: "greedy"
    kind: "heuristic"
  - name: "chaos"
    kind: "random"
    params:
      seed: 9
outputs:
  jsonl: "bench/out/{run_id}/games.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
metrics:
  baseline: "engine"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.games.permutations, DEFAULT_SEAT_PERMUTATIONS);
        assert_eq!(cfg.metrics.max_actions_per_game, DEFAULT_MAX_ACTIONS);
        assert!(cfg.logging.enable_structured);
        assert!(!cfg.logging.decision_details);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
        assert_eq!(cfg.agents[0].kind, AgentKind::Builtin);
        assert!(cfg.agents[0].params.is_mapping());

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/sevens_smoke/games.jsonl")
        );
        assert_eq!(
            outputs.summary_dir(),
            PathBuf::from("bench/out/sevens_smoke")
        );
    }

    #[test]
    fn rejects_missing_baseline() {
        let yaml = BASIC_YAML.replace("baseline: \"engine\"\n", "");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "metrics.baseline"
        ));
    }

    #[test]
    fn rejects_duplicate_agents() {
        let yaml = BASIC_YAML.replace("name: \"greedy\"", "name: \"engine\"");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("duplicate agents should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "agents"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("sevens_smoke", "sevens smoke");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn rejects_zero_games() {
        let yaml = BASIC_YAML.replace("count: 16", "count: 0");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("zero games");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "games.count"
        ));
    }

    #[test]
    fn unknown_agent_kind_fails_to_parse() {
        let yaml = BASIC_YAML.replace("kind: \"random\"", "kind: \"oracle\"");
        assert!(serde_yaml::from_str::<BenchmarkConfig>(&yaml).is_err());
    }
}
