use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::{AgentConfig, AgentKind, BenchmarkConfig};
use crate::tournament::{DecisionSummary, GameOutcome};

const CONFIDENCE_Z: f64 = 1.96; // 95% CI

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("baseline agent '{0}' not present in tournament results")]
    MissingBaseline(String),
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("baseline '{0}' missing for game {1}")]
    MissingBaselineGame(String, String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub struct AnalyticsCollector {
    baseline: String,
    agents: HashMap<String, AgentAccumulator>,
    comparisons: HashMap<String, ComparisonAccumulator>,
    agent_order: Vec<String>,
    latency_budget_ms: u64,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Result<Self, AnalyticsError> {
        let baseline = config
            .metrics
            .baseline
            .clone()
            .ok_or_else(|| AnalyticsError::MissingBaseline("<unset>".into()))?;

        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for agent in &config.agents {
            agents.insert(
                agent.name.clone(),
                AgentAccumulator::new(agent.clone(), config.metrics.latency_budget_ms),
            );
            order.push(agent.name.clone());
        }

        Ok(Self {
            baseline,
            agents,
            comparisons: HashMap::new(),
            agent_order: order,
            latency_budget_ms: config.metrics.latency_budget_ms,
        })
    }

    pub fn record_game(
        &mut self,
        game_index: usize,
        permutation_index: usize,
        outcome: &GameOutcome,
    ) -> Result<(), AnalyticsError> {
        let game_id = format!("G{game_index:05}_P{permutation_index:02}");

        let baseline_position = outcome
            .seat_results
            .iter()
            .find(|seat| seat.agent_name == self.baseline)
            .map(|seat| seat.finish_position as f64)
            .ok_or_else(|| AnalyticsError::MissingBaselineGame(self.baseline.clone(), game_id))?;

        for seat in &outcome.seat_results {
            let acc = self
                .agents
                .get_mut(&seat.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(seat.agent_name.clone()))?;
            acc.record_game(seat.finish_position, &seat.metrics);
        }

        for seat in &outcome.seat_results {
            if seat.agent_name == self.baseline {
                continue;
            }
            let diff = seat.finish_position as f64 - baseline_position;
            self.comparisons
                .entry(seat.agent_name.clone())
                .or_insert_with(ComparisonAccumulator::new)
                .record(diff);
        }

        Ok(())
    }

    pub fn finalize(mut self) -> Result<AnalyticsSummary, AnalyticsError> {
        let mut reports = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                reports.push(acc.into_report());
            }
        }

        if !reports.iter().any(|report| report.name == self.baseline) {
            return Err(AnalyticsError::MissingBaseline(self.baseline));
        }

        let mut comparisons = Vec::new();
        for report in &reports {
            let (p_value, sample_size) = if report.name == self.baseline {
                (1.0, report.games)
            } else {
                self.comparisons
                    .remove(&report.name)
                    .map(ComparisonAccumulator::wilcoxon_signed_rank)
                    .unwrap_or((1.0, 0))
            };
            comparisons.push(ComparisonReport {
                agent: report.name.clone(),
                p_value,
                sample_size,
            });
        }

        Ok(AnalyticsSummary {
            baseline: self.baseline,
            agents: reports,
            comparisons,
            latency_budget_ms: self.latency_budget_ms,
        }
        .enrich())
    }
}

struct AgentAccumulator {
    config: AgentConfig,
    positions: Vec<f64>,
    wins: u32,
    total_latency_ms: f64,
    total_decisions: u64,
    latency_budget_ms: u64,
}

impl AgentAccumulator {
    fn new(config: AgentConfig, latency_budget_ms: u64) -> Self {
        Self {
            config,
            positions: Vec::new(),
            wins: 0,
            total_latency_ms: 0.0,
            total_decisions: 0,
            latency_budget_ms,
        }
    }

    fn record_game(&mut self, finish_position: usize, metrics: &DecisionSummary) {
        self.positions.push(finish_position as f64);
        if finish_position == 1 {
            self.wins += 1;
        }
        self.total_latency_ms += metrics.total_ms;
        self.total_decisions += u64::from(metrics.decisions);
    }

    fn into_report(self) -> AgentReport {
        let games = self.positions.len();
        let avg_position = if games == 0 {
            0.0
        } else {
            self.positions.iter().sum::<f64>() / games as f64
        };

        let avg_latency = if self.total_decisions == 0 {
            0.0
        } else {
            self.total_latency_ms / self.total_decisions as f64
        };

        AgentReport {
            name: self.config.name,
            kind: self.config.kind,
            params: self.config.params,
            games,
            avg_position,
            ci95: confidence_interval(&self.positions),
            wins: self.wins as usize,
            average_ms_per_decision: avg_latency,
            delta_vs_baseline: 0.0,
            over_budget: avg_latency > self.latency_budget_ms as f64,
        }
    }
}

/// Paired per-game differences against the baseline.
#[derive(Clone)]
struct ComparisonAccumulator {
    diffs: Vec<f64>,
}

impl ComparisonAccumulator {
    fn new() -> Self {
        Self { diffs: Vec::new() }
    }

    fn record(&mut self, diff: f64) {
        self.diffs.push(diff);
    }

    /// Two-sided p-value by normal approximation, with tie correction.
    fn wilcoxon_signed_rank(self) -> (f64, usize) {
        let mut paired: Vec<(f64, f64)> = self
            .diffs
            .into_iter()
            .filter(|d| d.abs() > f64::EPSILON)
            .map(|d| (d.abs(), d.signum()))
            .collect();
        let n = paired.len();
        if n == 0 {
            return (1.0, 0);
        }

        paired.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut w_plus = 0.0;
        let mut w_minus = 0.0;
        let mut tie_adjustment = 0.0;
        let mut i = 0;
        while i < n {
            let mut j = i;
            while j + 1 < n && (paired[j + 1].0 - paired[i].0).abs() < 1e-12 {
                j += 1;
            }
            let rank = (i + j + 2) as f64 / 2.0;
            for &(_, sign) in &paired[i..=j] {
                if sign > 0.0 {
                    w_plus += rank;
                } else {
                    w_minus += rank;
                }
            }
            let ties = (j - i + 1) as f64;
            if ties > 1.0 {
                tie_adjustment += (ties.powi(3) - ties) / 48.0;
            }
            i = j + 1;
        }

        let w = f64::min(w_plus, w_minus);
        let n_f = n as f64;
        let mean_w = n_f * (n_f + 1.0) / 4.0;
        let variance_w = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_adjustment;
        if variance_w <= 0.0 {
            return (1.0, n);
        }

        let z = (((w - mean_w).abs() - 0.5) / variance_w.sqrt()).max(0.0);
        let Ok(normal) = Normal::new(0.0, 1.0) else {
            return (1.0, n);
        };
        let p = 2.0 * (1.0 - normal.cdf(z));
        (p.clamp(0.0, 1.0), n)
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: String,
    pub agents: Vec<AgentReport>,
    pub comparisons: Vec<ComparisonReport>,
    pub latency_budget_ms: u64,
}

impl AnalyticsSummary {
    pub fn enrich(mut self) -> Self {
        let baseline_avg = self
            .agents
            .iter()
            .find(|agent| agent.name == self.baseline)
            .map(|agent| agent.avg_position)
            .unwrap_or(0.0);

        for agent in &mut self.agents {
            agent.delta_vs_baseline = agent.avg_position - baseline_avg;
        }

        self
    }

    pub fn to_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Tournament Summary\n\n");
        rows.push_str(&format!(
            "Baseline: {} (lower finish position is better)\n\n",
            self.baseline
        ));
        rows.push_str(&format!(
            "Latency budget: {} ms average per decision\n\n",
            self.latency_budget_ms
        ));
        rows.push_str("| Agent | Kind | Games | Avg Position | Δ vs baseline | 95% CI | Win % | Avg ms/decision | Over Budget | p-value |\n");
        rows.push_str("|-------|------|-------|--------------|----------------|--------|-------|------------------|-------------|---------|\n");

        for agent in &self.agents {
            let p_value = self
                .comparisons
                .iter()
                .find(|c| c.agent == agent.name)
                .map(|c| c.p_value)
                .unwrap_or(1.0);
            let win_rate = if agent.games == 0 {
                0.0
            } else {
                agent.wins as f64 / agent.games as f64
            };

            rows.push_str(&format!(
                "| {name} | {kind:?} | {games} | {avg:.3} | {delta:+.3} | [{ci_low:.3}, {ci_high:.3}] | {win:.1}% | {latency:.3} | {over_budget} | {pval:.3} |\n",
                name = agent.name,
                kind = agent.kind,
                games = agent.games,
                avg = agent.avg_position,
                delta = agent.delta_vs_baseline,
                ci_low = agent.ci95.0,
                ci_high = agent.ci95.1,
                win = win_rate * 100.0,
                latency = agent.average_ms_per_decision,
                over_budget = if agent.over_budget { "Yes" } else { "No" },
                pval = p_value,
            ));
        }

        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.to_markdown()).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub kind: AgentKind,
    pub params: serde_yaml::Value,
    pub games: usize,
    pub avg_position: f64,
    pub ci95: (f64, f64),
    pub wins: usize,
    pub average_ms_per_decision: f64,
    #[serde(skip)]
    pub delta_vs_baseline: f64,
    #[serde(skip)]
    pub over_budget: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub agent: String,
    pub p_value: f64,
    pub sample_size: usize,
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let std_error = (variance / points.len() as f64).sqrt();
    let margin = CONFIDENCE_Z * std_error;
    (mean - margin, mean + margin)
}
