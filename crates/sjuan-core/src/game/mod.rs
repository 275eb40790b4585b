mod engine;
mod rotation;

pub use engine::{Game, MAX_PLAYERS, MIN_PLAYERS};
pub use rotation::{next_seat_with_cards, previous_seat_with_cards};
