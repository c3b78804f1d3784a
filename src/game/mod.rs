//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It can be driven by a human through the terminal front end or by any
//! automated controller calling [`GameEngine::step`] directly.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{
    GameEngine, REWARD_DEATH, REWARD_FOOD, REWARD_MOVE, StepInfo, StepOutcome, Termination,
};
pub use error::GameError;
pub use state::{GameState, Grid, Position, Snake};
