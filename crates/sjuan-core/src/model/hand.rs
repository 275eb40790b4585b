use crate::error::GameError;
use crate::model::card::Card;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn add(&mut self, card: Card) {
        let index = self.cards.partition_point(|held| *held < card);
        self.cards.insert(index, card);
    }

    pub fn remove(&mut self, card: Card) -> Result<(), GameError> {
        let index = self
            .cards
            .iter()
            .position(|&c| c == card)
            .ok_or(GameError::CardNotFound(card))?;
        self.cards.remove(index);
        Ok(())
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.binary_search(&card).is_ok()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
