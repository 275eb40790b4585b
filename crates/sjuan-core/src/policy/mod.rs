mod heuristic;
mod simple;

pub use heuristic::{ActionDecider, HeuristicPolicy};
pub use simple::{FirstLegalPolicy, RandomPolicy};

use crate::error::GameError;
use crate::model::action::Action;
use crate::model::board::BoardMatrix;
use crate::model::turn::Turn;
use core::fmt;
use core::str::FromStr;

/// Context provided to policies for decision-making
pub struct PolicyContext<'a> {
    pub board: &'a BoardMatrix,
    pub turn: &'a Turn,
}

/// Chooses one action from a turn's legal set.
pub trait Policy: Send {
    fn choose_action(&mut self, ctx: &PolicyContext) -> Result<Action, GameError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    #[default]
    Heuristic,
    Random,
    FirstLegal,
}

impl PolicyKind {
    /// Builds a boxed policy. `seed` only matters for the random policy.
    pub fn spawn(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Heuristic => Box::new(HeuristicPolicy::new()),
            PolicyKind::Random => Box::new(RandomPolicy::with_seed(seed)),
            PolicyKind::FirstLegal => Box::new(FirstLegalPolicy),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Heuristic => "heuristic",
            PolicyKind::Random => "random",
            PolicyKind::FirstLegal => "first_legal",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "heuristic" | "default" => Ok(PolicyKind::Heuristic),
            "random" => Ok(PolicyKind::Random),
            "first_legal" | "first" | "easy" => Ok(PolicyKind::FirstLegal),
            other => Err(format!("unknown policy '{other}'")),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::PolicyKind;

    #[test]
    fn kinds_parse_from_aliases() {
        assert_eq!("Heuristic".parse::<PolicyKind>(), Ok(PolicyKind::Heuristic));
        assert_eq!("easy".parse::<PolicyKind>(), Ok(PolicyKind::FirstLegal));
        assert_eq!(" random ".parse::<PolicyKind>(), Ok(PolicyKind::Random));
        assert!("oracle".parse::<PolicyKind>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for kind in [
            PolicyKind::Heuristic,
            PolicyKind::Random,
            PolicyKind::FirstLegal,
        ] {
            assert_eq!(kind.to_string().parse::<PolicyKind>(), Ok(kind));
        }
    }
}
