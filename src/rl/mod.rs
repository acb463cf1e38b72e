//! Reinforcement learning plumbing around the simulation
//!
//! Provides:
//! - RL environment interface (reset, step with integer action codes)
//! - Replay memory of transitions with random sampling and persistence
//! - Baseline policies behind a common `Policy` trait

pub mod buffer;
pub mod environment;
pub mod persistence;
pub mod policy;

pub use buffer::{MemoryError, ReplayMemory, Transition};
pub use environment::SnakeEnvironment;
pub use policy::{GreedyPolicy, Policy, PolicyKind, RandomPolicy};
