use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Hearts),
            1 => Some(Suit::Diamonds),
            2 => Some(Suit::Clubs),
            3 => Some(Suit::Spades),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Hearts => "H",
            Suit::Diamonds => "D",
            Suit::Clubs => "C",
            Suit::Spades => "S",
        };
        f.write_str(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::Suit;

    #[test]
    fn declaration_order_is_hearts_first() {
        assert!(Suit::Hearts < Suit::Diamonds);
        assert!(Suit::Clubs < Suit::Spades);
        assert_eq!(Suit::ALL[0], Suit::Hearts);
    }

    #[test]
    fn from_index_maps_valid_values() {
        assert_eq!(Suit::from_index(2), Some(Suit::Clubs));
        assert_eq!(Suit::from_index(4), None);
        for (i, suit) in Suit::ALL.iter().enumerate() {
            assert_eq!(suit.index(), i);
        }
    }

    #[test]
    fn display_returns_ascii_symbols() {
        assert_eq!(Suit::Hearts.to_string(), "H");
        assert_eq!(Suit::Spades.to_string(), "S");
    }
}
