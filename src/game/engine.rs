use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use tracing::debug;

use super::{
    action::{ActionError, Direction},
    config::{ConfigError, GameConfig},
    observation::{encode_observation, observation_len},
    state::{CollisionType, GameState, Point},
};

/// Reference start cell, clamped into smaller fields
pub const START_POSITION: Point = Point::new(5, 5);

/// Inclusive range of each axis when the field size is randomized
pub const RANDOM_FIELD_MIN: i32 = 10;
pub const RANDOM_FIELD_MAX: i32 = 30;

/// Steps without a reward change allowed per body segment
pub const STAGNATION_STEPS_PER_SEGMENT: u64 = 50;

const BASE_REWARD: f32 = 1.0;
const FOOD_REWARD: f32 = 2.0;
const DISTANCE_PENALTY: f32 = -1.0;
const COLLISION_REWARD: f32 = -1.0;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred, wall takes precedence
    pub collision_type: Option<CollisionType>,
    /// Whether the step moved the head no further from the food
    pub distance_improved: bool,
    /// Whether the stagnation rule ended the episode
    pub stagnated: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Observation of the state after the step
    pub observation: Vec<f32>,
    /// Reward of this tick alone
    pub reward: f32,
    /// Whether the episode has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
///
/// Owns the configuration, the current field size and a seeded random
/// source. Episode state lives in a [`GameState`] handed in by the caller, so
/// any number of engines can run side by side without sharing anything.
pub struct GameEngine {
    config: GameConfig,
    field_size: Point,
    seed: u64,
    rng: ChaCha12Rng,
}

impl GameEngine {
    /// Create a new game engine, failing on an invalid configuration
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let field_size = Point::new(config.field_width as i32, config.field_height as i32);
        debug!(seed, width = field_size.x, height = field_size.y, "created game engine");

        Ok(Self {
            config,
            field_size,
            seed,
            rng: ChaCha12Rng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed of the random source, including one drawn from entropy
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Field size used by the next non-random reset
    pub fn field_size(&self) -> Point {
        self.field_size
    }

    pub fn window_size(&self) -> usize {
        self.config.window_size
    }

    pub fn observation_len(&self) -> usize {
        observation_len(self.config.window_size)
    }

    /// Start a new episode
    ///
    /// With `random_field_size` both axes are redrawn from `[10, 30]` and the
    /// new size sticks for later resets; otherwise the current size is kept.
    pub fn reset(&mut self, random_field_size: bool) -> GameState {
        if random_field_size {
            let width = self.rng.gen_range(RANDOM_FIELD_MIN..=RANDOM_FIELD_MAX);
            let height = self.rng.gen_range(RANDOM_FIELD_MIN..=RANDOM_FIELD_MAX);
            self.field_size = Point::new(width, height);
        }

        let start = Point::new(
            START_POSITION.x.min(self.field_size.x - 1),
            START_POSITION.y.min(self.field_size.y - 1),
        );
        let food = self.random_cell(self.field_size);

        debug!(
            width = self.field_size.x,
            height = self.field_size.y,
            food.x = food.x,
            food.y = food.y,
            "reset episode"
        );

        GameState::new(start, food, self.field_size)
    }

    /// Observation of `state` for this engine's window size
    pub fn observe(&self, state: &GameState) -> Vec<f32> {
        encode_observation(state, self.config.window_size)
    }

    /// Apply an integer action code, rejecting codes outside `0..=3`
    pub fn step(
        &mut self,
        state: &mut GameState,
        action: usize,
    ) -> Result<StepResult, ActionError> {
        let direction = Direction::from_code(action)?;
        Ok(self.update(state, direction))
    }

    /// Advance the episode by one tick
    ///
    /// The heading is overwritten unconditionally; refusing a reversal is up
    /// to the caller.
    pub fn update(&mut self, state: &mut GameState, direction: Direction) -> StepResult {
        state.direction = direction;

        let head = state.head();
        let next_head = head.moved_in_direction(direction);

        let distance_improved = moves_closer(head, next_head, state.food);

        let hit_wall = !state.is_in_bounds(next_head);

        // Food under the current head is eaten as the head leaves it
        let ate_food = head == state.food;
        if ate_food {
            state.food = self.random_cell(state.field_size);
        } else {
            state.body.pop_back();
        }

        // Checked before the new head goes in, so the vacated tail cell is free
        let hit_self = state.body.contains(&next_head);

        state.body.push_front(next_head);

        let collision_type = if hit_wall {
            Some(CollisionType::Wall)
        } else if hit_self {
            Some(CollisionType::SelfCollision)
        } else {
            None
        };

        let reward = if collision_type.is_some() {
            COLLISION_REWARD
        } else {
            let food_term = if ate_food { FOOD_REWARD } else { 0.0 };
            let distance_term = if distance_improved { 0.0 } else { DISTANCE_PENALTY };
            BASE_REWARD + food_term + distance_term
        };

        let previous_reward = state.reward;
        state.reward += f64::from(reward);
        if state.reward != previous_reward {
            state.last_reward_change = state.steps;
        }

        let stagnation_limit = STAGNATION_STEPS_PER_SEGMENT * state.len() as u64;
        let stagnated = state.last_reward_change.abs_diff(state.steps) > stagnation_limit;

        let terminated = collision_type.is_some() || stagnated;
        if terminated {
            debug!(
                steps = state.steps,
                length = state.len(),
                reward = state.reward,
                collision = ?collision_type,
                stagnated,
                "episode terminated"
            );
        }

        state.steps += 1;

        StepResult {
            observation: self.observe(state),
            reward,
            terminated,
            info: StepInfo {
                ate_food,
                collision_type,
                distance_improved,
                stagnated,
            },
        }
    }

    /// Uniformly random cell of a field; the body is not avoided
    fn random_cell(&mut self, field_size: Point) -> Point {
        let x = self.rng.gen_range(0..field_size.x);
        let y = self.rng.gen_range(0..field_size.y);
        Point::new(x, y)
    }
}

/// Whether moving from `head` to `next_head` keeps or shrinks the distance
/// to `food`; ties count as an improvement
fn moves_closer(head: Point, next_head: Point, food: Point) -> bool {
    next_head.manhattan_distance(food) <= head.manhattan_distance(food)
}
