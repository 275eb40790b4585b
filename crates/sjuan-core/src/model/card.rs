use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Field order matters: the derived ordering is suit first, then rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const SEVEN_OF_HEARTS: Card = Card::new(Rank::Seven, Suit::Hearts);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Suit-major index in `0..52`.
    pub const fn to_id(self) -> u8 {
        (self.suit as u8) * 13 + (self.rank as u8 - 1)
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        let Some(suit) = Suit::from_index((id / 13) as usize) else {
            return None;
        };
        let Some(rank) = Rank::from_value(id % 13 + 1) else {
            return None;
        };
        Some(Card::new(rank, suit))
    }

    pub const fn is_seven(self) -> bool {
        matches!(self.rank, Rank::Seven)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, Rank, Suit};

    #[test]
    fn ordering_is_suit_then_rank() {
        let king_hearts = Card::new(Rank::King, Suit::Hearts);
        let ace_diamonds = Card::new(Rank::Ace, Suit::Diamonds);
        let two_hearts = Card::new(Rank::Two, Suit::Hearts);
        assert!(king_hearts < ace_diamonds);
        assert!(two_hearts < king_hearts);
    }

    #[test]
    fn ids_cover_the_deck_without_gaps() {
        for id in 0..52u8 {
            let card = Card::from_id(id).expect("id in range");
            assert_eq!(card.to_id(), id);
        }
        assert_eq!(Card::from_id(52), None);
        assert_eq!(Card::SEVEN_OF_HEARTS.to_id(), 6);
        assert_eq!(Card::new(Rank::King, Suit::Spades).to_id(), 51);
    }

    #[test]
    fn equality_uses_both_fields() {
        assert_eq!(
            Card::new(Rank::Seven, Suit::Hearts),
            Card::SEVEN_OF_HEARTS
        );
        assert_ne!(Card::new(Rank::Seven, Suit::Clubs), Card::SEVEN_OF_HEARTS);
        assert!(Card::new(Rank::Seven, Suit::Clubs).is_seven());
    }

    #[test]
    fn display_is_rank_then_suit() {
        assert_eq!(Card::new(Rank::Ten, Suit::Spades).to_string(), "10S");
        assert_eq!(Card::SEVEN_OF_HEARTS.to_string(), "7H");
    }
}
