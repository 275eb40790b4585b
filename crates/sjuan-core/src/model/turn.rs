use crate::error::GameError;
use crate::model::action::{Action, ActionKind};
use crate::model::card::Card;
use std::collections::BTreeSet;

/// The seat on the clock and what it may do. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    player: usize,
    actions: BTreeSet<Action>,
}

impl Turn {
    pub fn new(player: usize, actions: impl IntoIterator<Item = Action>) -> Result<Self, GameError> {
        let actions: BTreeSet<Action> = actions.into_iter().collect();
        if actions.is_empty() {
            return Err(GameError::NoLegalActions);
        }
        Ok(Self { player, actions })
    }

    /// Seat index of the player who must act.
    pub fn player(&self) -> usize {
        self.player
    }

    /// Legal actions in ascending order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn to_vec(&self) -> Vec<Action> {
        self.actions.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn contains(&self, action: &Action) -> bool {
        self.actions.contains(action)
    }

    pub fn has_kind(&self, kind: ActionKind) -> bool {
        self.actions.iter().any(|action| action.kind() == kind)
    }

    /// Card payloads of the legal actions of one kind, ascending.
    pub fn cards_for(&self, kind: ActionKind) -> Vec<Card> {
        self.actions
            .iter()
            .filter(|action| action.kind() == kind)
            .filter_map(|action| action.card())
            .collect()
    }
}
