#![deny(warnings)]

pub mod env;
pub mod error;
pub mod game;
pub mod model;
pub mod policy;

pub use error::GameError;
pub use game::Game;
