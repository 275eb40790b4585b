use crate::model::action::Action;
use crate::model::card::Card;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("action '{0}' is not legal this turn")]
    InvalidAction(Action),
    #[error("card {0} cannot be used here")]
    InvalidCard(Card),
    #[error("the deck is empty")]
    EmptyDeck,
    #[error("card {0} is not in the hand")]
    CardNotFound(Card),
    #[error("no player with cards left to take the turn")]
    NoPlayersWithCards,
    #[error("no legal actions available for the turn")]
    NoLegalActions,
    #[error("the game has not been started or is already over")]
    NotStarted,
    #[error("a game needs between 2 and 52 players, got {count}")]
    InvalidRoster { count: usize },
}
