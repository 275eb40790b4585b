use crate::error::GameError;
use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

/// Placement flags indexed `[suit][rank]`, suit-major.
pub type BoardMatrix = [[bool; 13]; 4];

/// The four suit sequences built outward from the sevens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    placed: BoardMatrix,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks cards as placed without checking legality.
    pub fn from_placed(cards: &[Card]) -> Self {
        let mut board = Self::new();
        for card in cards {
            board.placed[card.suit.index()][card.rank.index()] = true;
        }
        board
    }

    pub fn from_matrix(placed: BoardMatrix) -> Self {
        Self { placed }
    }

    pub fn is_placed(&self, card: Card) -> bool {
        self.has(card.suit, card.rank)
    }

    fn has(&self, suit: Suit, rank: Rank) -> bool {
        self.placed[suit.index()][rank.index()]
    }

    pub fn is_valid(&self, card: Card) -> bool {
        if self.is_placed(card) {
            return false;
        }

        if !self.is_placed(Card::SEVEN_OF_HEARTS) {
            return card == Card::SEVEN_OF_HEARTS;
        }

        card.is_seven()
            || self.has(card.suit, card.rank.below())
            || self.has(card.suit, card.rank.above())
    }

    /// Keeps the candidates that may be placed now, in their original order.
    pub fn valid_subset(&self, cards: &[Card]) -> Vec<Card> {
        cards
            .iter()
            .copied()
            .filter(|&card| self.is_valid(card))
            .collect()
    }

    pub fn place(&mut self, card: Card) -> Result<(), GameError> {
        if !self.is_valid(card) {
            return Err(GameError::InvalidCard(card));
        }
        self.placed[card.suit.index()][card.rank.index()] = true;
        Ok(())
    }

    pub fn snapshot(&self) -> BoardMatrix {
        self.placed
    }

    pub fn placed_count(&self) -> usize {
        self.placed
            .iter()
            .map(|row| row.iter().filter(|&&cell| cell).count())
            .sum()
    }

    /// Lowest and highest placed rank of a suit.
    pub fn bounds(&self, suit: Suit) -> Option<(Rank, Rank)> {
        bounds_in(&self.placed, suit)
    }
}

pub fn bounds_in(matrix: &BoardMatrix, suit: Suit) -> Option<(Rank, Rank)> {
    let row = &matrix[suit.index()];
    let low = row.iter().position(|&cell| cell)?;
    let high = row.iter().rposition(|&cell| cell)?;
    Some((
        Rank::from_value(low as u8 + 1)?,
        Rank::from_value(high as u8 + 1)?,
    ))
}
