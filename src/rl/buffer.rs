//! Experience replay memory for off-policy learners
//!
//! Stores `(state, action, next_state, reward)` transitions in a bounded pool.
//! The pool is reshuffled after every push and sampled uniformly without
//! replacement. Once full, each push evicts the oldest stored transition.

use std::path::Path;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::persistence::{self, MemorySnapshot};

/// One step of experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Observation before the action
    pub state: Vec<f32>,
    /// Action code taken
    pub action: usize,
    /// Observation after the action, `None` if the episode terminated
    pub next_state: Option<Vec<f32>>,
    /// Tick reward
    pub reward: f32,
}

/// Errors raised by [`ReplayMemory`]
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("replay memory capacity must be at least 1")]
    ZeroCapacity,
    #[error("cannot sample {requested} transitions from a memory holding {available}")]
    NotEnoughTransitions { requested: usize, available: usize },
    #[error("replay memory file holds {len} transitions but declares capacity {capacity}")]
    CapacityExceeded { len: usize, capacity: usize },
    #[error("replay memory file has duplicate ages or ages not below next_age {next_age}")]
    InconsistentAges { next_age: u64 },
    #[error("unsupported replay memory format version {0}")]
    UnsupportedVersion(u32),
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed replay memory file {path:?}: {source}")]
    Format {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A stored transition tagged with its insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub age: u64,
    pub transition: Transition,
}

/// Bounded pool of transitions with random sampling
///
/// # Example
///
/// ```rust
/// use snake_env::rl::{ReplayMemory, Transition};
///
/// let mut memory = ReplayMemory::new(2, 0).unwrap();
/// for reward in [1.0, 2.0, 3.0] {
///     memory.push(Transition {
///         state: vec![0.0],
///         action: 1,
///         next_state: None,
///         reward,
///     });
/// }
///
/// // The first transition was evicted
/// assert_eq!(memory.len(), 2);
/// assert!(memory.sample(3).is_err());
/// ```
pub struct ReplayMemory {
    entries: Vec<Entry>,
    capacity: usize,
    next_age: u64,
    rng: ChaCha12Rng,
}

impl ReplayMemory {
    /// Create an empty memory holding at most `capacity` transitions
    pub fn new(capacity: usize, seed: u64) -> Result<Self, MemoryError> {
        if capacity == 0 {
            return Err(MemoryError::ZeroCapacity);
        }

        Ok(Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            next_age: 0,
            rng: ChaCha12Rng::seed_from_u64(seed),
        })
    }

    /// Create a memory from a file written by [`ReplayMemory::save`]
    pub fn from_file(path: &Path, seed: u64) -> Result<Self, MemoryError> {
        let snapshot = persistence::load_snapshot(path)?;
        Ok(Self {
            entries: snapshot.entries,
            capacity: snapshot.capacity,
            next_age: snapshot.next_age,
            rng: ChaCha12Rng::seed_from_u64(seed),
        })
    }

    /// Add a transition, evicting the oldest one when full, then reshuffle
    pub fn push(&mut self, transition: Transition) {
        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        self.entries.push(Entry {
            age: self.next_age,
            transition,
        });
        self.next_age += 1;

        self.entries.shuffle(&mut self.rng);
    }

    /// Draw `n` distinct transitions uniformly at random
    pub fn sample(&mut self, n: usize) -> Result<Vec<Transition>, MemoryError> {
        if n > self.entries.len() {
            return Err(MemoryError::NotEnoughTransitions {
                requested: n,
                available: self.entries.len(),
            });
        }

        Ok(self
            .entries
            .choose_multiple(&mut self.rng, n)
            .map(|entry| entry.transition.clone())
            .collect())
    }

    /// Stored transitions in their current, shuffled order
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.entries.iter().map(|entry| &entry.transition)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Write the whole memory to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<(), MemoryError> {
        persistence::save_snapshot(path, self.capacity, self.next_age, &self.entries)
    }

    /// Replace the contents and capacity with those stored at `path`
    ///
    /// On error the memory is left untouched.
    pub fn load(&mut self, path: &Path) -> Result<(), MemoryError> {
        let MemorySnapshot {
            capacity,
            next_age,
            entries,
            ..
        } = persistence::load_snapshot(path)?;

        self.capacity = capacity;
        self.next_age = next_age;
        self.entries = entries;
        Ok(())
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| entry.age)
            .map(|(idx, _)| idx);

        if let Some(idx) = oldest {
            self.entries.swap_remove(idx);
        }
    }
}
