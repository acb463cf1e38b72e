//! Core simulation for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Every engine owns its own seeded random source, so episodes are reproducible
//! and engines can run in parallel without sharing state.

pub mod action;
pub mod config;
pub mod engine;
pub mod observation;
pub mod state;

// Re-export commonly used types
pub use action::{ActionError, Direction};
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use observation::{encode_observation, observation_len};
pub use state::{CollisionType, GameState, Point};
