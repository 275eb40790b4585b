use super::{Policy, PolicyContext};
use crate::error::GameError;
use crate::model::action::Action;
use crate::model::board::Board;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;

/// Uniform choice over the legal set.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose_action(&mut self, ctx: &PolicyContext) -> Result<Action, GameError> {
        ctx.turn
            .actions()
            .copied()
            .choose(&mut self.rng)
            .ok_or(GameError::NoLegalActions)
    }
}

/// Takes the lowest legal action.
///
/// When giving, the lowest card the giver cannot play goes first. Giving away
/// a playable card lets two stuck seats hand it back and forth forever.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalPolicy;

impl Policy for FirstLegalPolicy {
    fn choose_action(&mut self, ctx: &PolicyContext) -> Result<Action, GameError> {
        let first = ctx
            .turn
            .actions()
            .next()
            .copied()
            .ok_or(GameError::NoLegalActions)?;
        if !matches!(first, Action::GiveCard(_)) {
            return Ok(first);
        }

        let board = Board::from_matrix(*ctx.board);
        let dead_card = ctx.turn.actions().copied().find(
            |action| matches!(action, Action::GiveCard(card) if !board.is_valid(*card)),
        );
        Ok(dead_card.unwrap_or(first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::turn::Turn;

    fn sample_turn() -> Turn {
        Turn::new(
            0,
            [
                Action::PassTurn,
                Action::PlayCard(Card::new(Rank::Six, Suit::Hearts)),
                Action::PlayCard(Card::new(Rank::Eight, Suit::Hearts)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn random_policy_stays_within_legal_set() {
        let board = [[false; 13]; 4];
        let turn = sample_turn();
        let ctx = PolicyContext {
            board: &board,
            turn: &turn,
        };
        let mut policy = RandomPolicy::with_seed(7);
        for _ in 0..32 {
            let action = policy.choose_action(&ctx).unwrap();
            assert!(turn.contains(&action));
        }
    }

    #[test]
    fn random_policy_is_reproducible_per_seed() {
        let board = [[false; 13]; 4];
        let turn = sample_turn();
        let ctx = PolicyContext {
            board: &board,
            turn: &turn,
        };
        let mut a = RandomPolicy::with_seed(11);
        let mut b = RandomPolicy::with_seed(11);
        for _ in 0..16 {
            assert_eq!(
                a.choose_action(&ctx).unwrap(),
                b.choose_action(&ctx).unwrap()
            );
        }
    }

    #[test]
    fn first_legal_takes_the_lowest_action() {
        let board = [[false; 13]; 4];
        let turn = sample_turn();
        let ctx = PolicyContext {
            board: &board,
            turn: &turn,
        };
        assert_eq!(
            FirstLegalPolicy.choose_action(&ctx).unwrap(),
            Action::PlayCard(Card::new(Rank::Six, Suit::Hearts))
        );
    }

    fn spades_to_ten() -> Board {
        let mut placed = vec![Card::SEVEN_OF_HEARTS];
        placed.extend(
            [Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five]
                .into_iter()
                .chain([Rank::Six, Rank::Seven, Rank::Eight, Rank::Nine, Rank::Ten])
                .map(|rank| Card::new(rank, Suit::Spades)),
        );
        Board::from_placed(&placed)
    }

    #[test]
    fn first_legal_keeps_its_playable_card_when_giving() {
        let board = spades_to_ten().snapshot();
        let jack = Card::new(Rank::Jack, Suit::Spades);
        let king = Card::new(Rank::King, Suit::Spades);
        let turn = Turn::new(3, [Action::GiveCard(jack), Action::GiveCard(king)]).unwrap();
        let ctx = PolicyContext {
            board: &board,
            turn: &turn,
        };
        assert_eq!(
            FirstLegalPolicy.choose_action(&ctx).unwrap(),
            Action::GiveCard(king)
        );
    }

    #[test]
    fn first_legal_gives_the_lowest_card_when_all_are_playable() {
        let board = spades_to_ten().snapshot();
        let jack = Card::new(Rank::Jack, Suit::Spades);
        let six = Card::new(Rank::Six, Suit::Hearts);
        let turn = Turn::new(1, [Action::GiveCard(jack), Action::GiveCard(six)]).unwrap();
        let ctx = PolicyContext {
            board: &board,
            turn: &turn,
        };
        assert_eq!(
            FirstLegalPolicy.choose_action(&ctx).unwrap(),
            Action::GiveCard(six)
        );
    }
}
