use crate::error::GameError;
use crate::model::card::Card;
use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Who is in control of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    Human,
    /// Resolved by the engine's own policy.
    Ai,
    /// Driven from outside the engine, e.g. a training environment.
    Agent,
}

impl PlayerKind {
    pub const fn is_automated(self) -> bool {
        matches!(self, PlayerKind::Ai)
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerKind::Human => "Human",
            PlayerKind::Ai => "AI",
            PlayerKind::Agent => "Agent",
        };
        f.write_str(label)
    }
}

/// Identity of a seat, fixed for the lifetime of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub kind: PlayerKind,
}

impl PlayerInfo {
    pub fn new(name: impl Into<String>, kind: PlayerKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn human(name: impl Into<String>) -> Self {
        Self::new(name, PlayerKind::Human)
    }

    pub fn ai(name: impl Into<String>) -> Self {
        Self::new(name, PlayerKind::Ai)
    }

    pub fn agent(name: impl Into<String>) -> Self {
        Self::new(name, PlayerKind::Agent)
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    info: PlayerInfo,
    hand: Hand,
}

impl Player {
    pub fn new(info: PlayerInfo) -> Self {
        Self {
            info,
            hand: Hand::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn kind(&self) -> PlayerKind {
        self.info.kind
    }

    pub fn info(&self) -> &PlayerInfo {
        &self.info
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    /// Owned copy of the hand, in sorted order.
    pub fn hand_cards(&self) -> Vec<Card> {
        self.hand.cards().to_vec()
    }

    pub fn card_count(&self) -> usize {
        self.hand.len()
    }

    pub fn has_cards(&self) -> bool {
        !self.hand.is_empty()
    }

    pub fn has_card(&self, card: Card) -> bool {
        self.hand.contains(card)
    }

    pub fn add_card(&mut self, card: Card) {
        self.hand.add(card);
    }

    pub fn remove_card(&mut self, card: Card) -> Result<(), GameError> {
        self.hand.remove(card)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.info.name, self.info.kind)
    }
}
