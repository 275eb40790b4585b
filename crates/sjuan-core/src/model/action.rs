use crate::model::card::Card;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A move a player may choose. Variant order defines the ordering of legal sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    PlayAllCards,
    PlayCard(Card),
    TakeCard,
    GiveCard(Card),
    PassTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    PlayAllCards,
    PlayCard,
    TakeCard,
    GiveCard,
    PassTurn,
}

impl Action {
    pub const fn kind(self) -> ActionKind {
        match self {
            Action::PlayAllCards => ActionKind::PlayAllCards,
            Action::PlayCard(_) => ActionKind::PlayCard,
            Action::TakeCard => ActionKind::TakeCard,
            Action::GiveCard(_) => ActionKind::GiveCard,
            Action::PassTurn => ActionKind::PassTurn,
        }
    }

    pub const fn card(self) -> Option<Card> {
        match self {
            Action::PlayCard(card) | Action::GiveCard(card) => Some(card),
            Action::PlayAllCards | Action::TakeCard | Action::PassTurn => None,
        }
    }

    /// Actions after which the acting hand may have run out.
    pub const fn sheds_cards(self) -> bool {
        matches!(
            self,
            Action::PlayAllCards | Action::PlayCard(_) | Action::GiveCard(_)
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::PlayAllCards => f.write_str("Play all cards"),
            Action::PlayCard(card) => write!(f, "Play {card}"),
            Action::TakeCard => f.write_str("Take card"),
            Action::GiveCard(card) => write!(f, "Give {card}"),
            Action::PassTurn => f.write_str("Pass turn"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, ActionKind};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn equality_compares_payload() {
        let six = Card::new(Rank::Six, Suit::Hearts);
        let eight = Card::new(Rank::Eight, Suit::Hearts);
        assert_eq!(Action::PlayCard(six), Action::PlayCard(six));
        assert_ne!(Action::PlayCard(six), Action::PlayCard(eight));
        assert_ne!(Action::PlayCard(six), Action::GiveCard(six));
    }

    #[test]
    fn card_payload_only_on_card_actions() {
        let card = Card::new(Rank::Two, Suit::Spades);
        assert_eq!(Action::GiveCard(card).card(), Some(card));
        assert_eq!(Action::TakeCard.card(), None);
        assert_eq!(Action::PlayAllCards.kind(), ActionKind::PlayAllCards);
    }

    #[test]
    fn display_names_the_card() {
        let card = Card::new(Rank::Queen, Suit::Diamonds);
        assert_eq!(Action::PlayCard(card).to_string(), "Play QD");
        assert_eq!(Action::GiveCard(card).to_string(), "Give QD");
        assert_eq!(Action::PassTurn.to_string(), "Pass turn");
    }
}
