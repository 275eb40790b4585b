//! Index-based stepping surface over [`Game`] for training collaborators.

mod action_space;
mod observation;

pub use action_space::{ACTION_COUNT, ActionSpace};
pub use observation::Observation;

use crate::error::GameError;
use crate::game::Game;
use crate::model::action::Action;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;

/// Reward added when the requested index is not legal for the current turn.
pub const INVALID_ACTION_PENALTY: f32 = -0.01;

/// Seat whose finishing position drives the terminal reward.
pub const AGENT_SEAT: usize = 0;

#[derive(Debug, Clone)]
pub struct Step {
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
    pub info: StepInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    /// Action that was actually executed.
    pub action: Action,
    /// True when the requested index was replaced by a sampled legal action.
    pub resampled: bool,
}

pub struct SjuanEnv {
    game: Game,
    space: ActionSpace,
    rng: StdRng,
}

impl SjuanEnv {
    /// Wraps and starts `game`.
    pub fn new(game: Game) -> Result<Self, GameError> {
        Self::with_rng(game, StdRng::from_entropy())
    }

    /// Like [`SjuanEnv::new`], with a seeded generator for illegal-choice resampling.
    pub fn with_seed(game: Game, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(game, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut game: Game, rng: StdRng) -> Result<Self, GameError> {
        game.start()?;
        Ok(Self {
            game,
            space: ActionSpace::new(),
            rng,
        })
    }

    pub fn reset(&mut self) -> Result<Observation, GameError> {
        self.game.start()?;
        Ok(self.observation())
    }

    pub fn step(&mut self, index: usize) -> Result<Step, GameError> {
        let turn = self.game.current_turn().ok_or(GameError::NotStarted)?;

        let requested = self.space.action(index).filter(|action| turn.contains(action));
        let (action, resampled) = match requested {
            Some(action) => (action, false),
            None => {
                let sampled = turn
                    .actions()
                    .copied()
                    .choose(&mut self.rng)
                    .ok_or(GameError::NoLegalActions)?;
                (sampled, true)
            }
        };

        self.game.execute(action)?;

        let done = self.game.is_finished();
        let reward = if done {
            self.terminal_reward()
        } else if resampled {
            INVALID_ACTION_PENALTY
        } else {
            0.0
        };

        Ok(Step {
            observation: self.observation(),
            reward,
            done,
            info: StepInfo { action, resampled },
        })
    }

    fn terminal_reward(&self) -> f32 {
        match self.game.finish_seats().first() {
            Some(&AGENT_SEAT) => 1.0,
            _ => -1.0,
        }
    }

    pub fn observation(&self) -> Observation {
        Observation::from_game(&self.game)
    }

    /// Legal actions of the current turn as indices into the action space.
    pub fn legal_indices(&self) -> Vec<usize> {
        self.game
            .legal_actions()
            .into_iter()
            .map(|action| self.space.index_of(action))
            .collect()
    }

    pub fn action_space(&self) -> &ActionSpace {
        &self.space
    }

    pub fn game(&self) -> &Game {
        &self.game
    }
}
