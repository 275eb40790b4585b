pub mod action;
pub mod board;
pub mod card;
pub mod deck;
pub mod hand;
pub mod player;
pub mod rank;
pub mod suit;
pub mod turn;
