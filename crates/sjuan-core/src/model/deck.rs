use crate::error::GameError;
use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::seq::SliceRandom;

pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    /// A deck with nothing left to deal.
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Removes the last card.
    pub fn deal(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::{DECK_SIZE, Deck};
    use crate::error::GameError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn shuffled(seed: u64) -> Deck {
        let mut deck = Deck::standard();
        deck.shuffle_in_place(&mut StdRng::seed_from_u64(seed));
        deck
    }

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), DECK_SIZE);
        let unique: HashSet<_> = deck.cards().iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = shuffled(42);
        let deck_b = shuffled(42);
        assert_eq!(deck_a.cards(), deck_b.cards());
        assert_eq!(deck_a.len(), DECK_SIZE);
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = shuffled(1);
        let deck_b = shuffled(2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn deal_takes_from_the_end_until_empty() {
        let mut deck = Deck::standard();
        let last = *deck.cards().last().unwrap();
        assert_eq!(deck.deal().unwrap(), last);
        assert_eq!(deck.len(), DECK_SIZE - 1);

        while !deck.is_empty() {
            deck.deal().unwrap();
        }
        assert_eq!(deck.deal(), Err(GameError::EmptyDeck));
    }
}
