use crate::game::Game;
use crate::model::board::BoardMatrix;
use crate::model::deck::DECK_SIZE;

/// Encoded view of the game from the seat whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Placed flags, suit-major.
    pub board: [bool; DECK_SIZE],
    /// One-hot hand of the observing seat.
    pub hand: [bool; DECK_SIZE],
    /// Hand sizes of every other seat, clockwise from the observer.
    pub opponent_hand_sizes: Vec<usize>,
}

impl Observation {
    /// Observes from the turn's player, or from the rotation seat once the game is over.
    pub fn from_game(game: &Game) -> Self {
        let seat = game
            .current_turn()
            .map(|turn| turn.player())
            .unwrap_or_else(|| game.current_seat());
        Self::for_seat(game, seat)
    }

    pub fn for_seat(game: &Game, seat: usize) -> Self {
        let mut hand = [false; DECK_SIZE];
        if let Some(player) = game.player(seat) {
            for card in player.hand().iter() {
                hand[card.to_id() as usize] = true;
            }
        }

        let players = game.players();
        let opponent_hand_sizes = (1..players.len())
            .map(|step| players[(seat + step) % players.len()].card_count())
            .collect();

        Self {
            board: flatten(&game.board_snapshot()),
            hand,
            opponent_hand_sizes,
        }
    }

    /// Length of the flattened vector.
    pub fn dimension(&self) -> usize {
        DECK_SIZE * 2 + self.opponent_hand_sizes.len()
    }

    pub fn to_vec(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(self.dimension());
        out.extend(self.board.iter().map(|&placed| i32::from(placed)));
        out.extend(self.hand.iter().map(|&held| i32::from(held)));
        out.extend(self.opponent_hand_sizes.iter().map(|&size| size as i32));
        out
    }
}

fn flatten(matrix: &BoardMatrix) -> [bool; DECK_SIZE] {
    let mut flat = [false; DECK_SIZE];
    for (suit, ranks) in matrix.iter().enumerate() {
        flat[suit * 13..(suit + 1) * 13].copy_from_slice(ranks);
    }
    flat
}
