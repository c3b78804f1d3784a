//! Block Snake - a step-driven Snake engine
//!
//! This library provides:
//! - Core game logic with a `reset` / `step(action)` interface (game module)
//! - Terminal front end for human play (input, render and modes modules)
//! - A headless driver for automated controllers (modes module)
//! - Session metrics (metrics module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
