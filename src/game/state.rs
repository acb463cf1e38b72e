use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::action::Direction;

/// An integer coordinate on the field, also used for unit directions and
/// field dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise sum
    #[allow(clippy::should_implement_trait)]
    pub const fn add(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Sum of absolute coordinate differences
    pub fn manhattan_distance(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Position one cell away in `direction`
    pub fn moved_in_direction(self, direction: Direction) -> Self {
        self.add(direction.delta())
    }
}

/// Why a step ended the episode through contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the field
    Wall,
    /// Head entered a body segment
    SelfCollision,
}

/// Complete state of one episode
///
/// The engine mutates this in place on every step; a reset replaces it
/// wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Body segments, head at the front
    pub body: VecDeque<Point>,
    /// Heading set by the most recent action
    pub direction: Direction,
    pub food: Point,
    /// Cumulative reward of the episode
    pub reward: f64,
    /// Field width (`x`) and height (`y`)
    pub field_size: Point,
    pub steps: u64,
    /// Step index at which `reward` last changed value
    pub last_reward_change: u64,
}

impl GameState {
    /// Fresh episode state: a single segment at `head` heading right
    pub fn new(head: Point, food: Point, field_size: Point) -> Self {
        Self {
            body: VecDeque::from([head]),
            direction: Direction::Right,
            food,
            reward: 0.0,
            field_size,
            steps: 0,
            last_reward_change: 0,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Point {
        self.body[0]
    }

    /// Body segments behind the head
    pub fn body_segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter().skip(1)
    }

    /// Number of segments including the head
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a state built by the engine
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Check if a position is within the field
    pub fn is_in_bounds(&self, pos: Point) -> bool {
        pos.x >= 0 && pos.x < self.field_size.x && pos.y >= 0 && pos.y < self.field_size.y
    }

    /// Check if a position is occupied by any segment, head included
    pub fn is_occupied_by_snake(&self, pos: Point) -> bool {
        self.body.contains(&pos)
    }
}
