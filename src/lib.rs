//! Snake environment for reinforcement learning
//!
//! This library provides:
//! - Core simulation, reward shaping and observation encoding (game module)
//! - Replay memory, baseline policies and an environment wrapper (rl module)
//! - Terminal and plain-text rendering (render module)
//! - Execution modes: human play, experience collection, inspection (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
