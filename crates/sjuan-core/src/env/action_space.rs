use crate::model::action::Action;
use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

/// Number of discrete actions: a play and a give for every card, plus three card-less actions.
pub const ACTION_COUNT: usize = 52 * 2 + 3;

/// Fixed index table over every action the engine can offer.
#[derive(Debug, Clone)]
pub struct ActionSpace {
    actions: Vec<Action>,
}

impl ActionSpace {
    pub fn new() -> Self {
        let mut actions = Vec::with_capacity(ACTION_COUNT);
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                let card = Card::new(rank, suit);
                actions.push(Action::PlayCard(card));
                actions.push(Action::GiveCard(card));
            }
        }
        actions.extend([Action::PlayAllCards, Action::TakeCard, Action::PassTurn]);
        Self { actions }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn action(&self, index: usize) -> Option<Action> {
        self.actions.get(index).copied()
    }

    pub fn index_of(&self, action: Action) -> usize {
        match action {
            Action::PlayCard(card) => card.to_id() as usize * 2,
            Action::GiveCard(card) => card.to_id() as usize * 2 + 1,
            Action::PlayAllCards => 104,
            Action::TakeCard => 105,
            Action::PassTurn => 106,
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

impl Default for ActionSpace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_layout_is_play_then_give_per_card() {
        let space = ActionSpace::new();
        assert_eq!(space.len(), ACTION_COUNT);
        assert_eq!(
            space.action(0),
            Some(Action::PlayCard(Card::new(Rank::Ace, Suit::Hearts)))
        );
        assert_eq!(
            space.action(1),
            Some(Action::GiveCard(Card::new(Rank::Ace, Suit::Hearts)))
        );
        assert_eq!(
            space.action(103),
            Some(Action::GiveCard(Card::new(Rank::King, Suit::Spades)))
        );
        assert_eq!(space.action(104), Some(Action::PlayAllCards));
        assert_eq!(space.action(106), Some(Action::PassTurn));
        assert_eq!(space.action(107), None);
    }

    #[test]
    fn index_of_agrees_with_table() {
        let space = ActionSpace::new();
        for (index, action) in space.actions().iter().enumerate() {
            assert_eq!(space.index_of(*action), index, "{action}");
        }
    }
}
