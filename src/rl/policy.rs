//! Baseline policies that map an observation to an action
//!
//! Learned agents plug in through the same [`Policy`] trait.

use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

use crate::game::Direction;
use crate::game::observation::{window_cell, window_size_of};

/// Anything that picks an action from an observation vector
pub trait Policy {
    fn select_action(&mut self, observation: &[f32]) -> Direction;
}

/// Uniformly random actions from a seeded source
pub struct RandomPolicy {
    rng: ChaCha12Rng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn select_action(&mut self, _observation: &[f32]) -> Direction {
        Direction::ALL[self.rng.gen_range(0..Direction::COUNT)]
    }
}

/// Heads for the food along the direction flags while avoiding occupied
/// neighbor cells of the observation window
///
/// Ties between equally good moves are broken randomly.
pub struct GreedyPolicy {
    rng: ChaCha12Rng,
}

impl GreedyPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    fn is_free(observation: &[f32], direction: Direction) -> bool {
        let Some(window_size) = window_size_of(observation) else {
            return true;
        };
        let delta = direction.delta();
        // A window of one cell says nothing about neighbors
        window_cell(observation, window_size, delta.x, delta.y).is_none_or(|cell| cell == 0.0)
    }
}

impl Policy for GreedyPolicy {
    fn select_action(&mut self, observation: &[f32]) -> Direction {
        // Flag order in the observation: up, down, left, right
        let towards_food: Vec<Direction> = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
        .into_iter()
        .zip(observation.iter())
        .filter(|(_, flag)| **flag > 0.0)
        .map(|(direction, _)| direction)
        .collect();

        let free: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&direction| Self::is_free(observation, direction))
            .collect();

        let safe_towards_food: Vec<Direction> = towards_food
            .iter()
            .copied()
            .filter(|direction| free.contains(direction))
            .collect();

        let candidates: &[Direction] = if !safe_towards_food.is_empty() {
            &safe_towards_food
        } else if !free.is_empty() {
            &free
        } else if !towards_food.is_empty() {
            &towards_food
        } else {
            &Direction::ALL
        };

        candidates
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Direction::Right)
    }
}

/// Selectable baseline policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Uniformly random actions
    Random,
    /// Move towards the food, avoiding adjacent occupied cells
    Greedy,
}

impl PolicyKind {
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::Greedy => Box::new(GreedyPolicy::new(seed)),
        }
    }
}
