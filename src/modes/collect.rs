//! Experience collection with a baseline policy
//!
//! Runs episodes in the Snake environment, stores every transition in a
//! replay memory and saves the memory at the end of the run.
//!
//! # Example
//!
//! ```rust,no_run
//! use snake_env::modes::{CollectConfig, CollectMode};
//! use std::path::PathBuf;
//!
//! let config = CollectConfig::new(500, PathBuf::from("data/memory.json"));
//! let mut collect = CollectMode::new(config)?;
//! collect.run()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::game::GameConfig;
use crate::metrics::EpisodeStats;
use crate::rl::{Policy, PolicyKind, ReplayMemory, SnakeEnvironment, Transition};

/// Configuration for collection mode
#[derive(Debug, Clone)]
pub struct CollectConfig {
    /// Number of episodes to run
    pub num_episodes: usize,

    /// Where the replay memory is written
    pub save_path: PathBuf,

    /// Replay memory capacity
    pub memory_capacity: usize,

    /// Log progress every N episodes
    pub log_frequency: usize,

    /// Load `save_path` first and keep adding to it; the file's capacity
    /// then replaces `memory_capacity`
    pub append: bool,

    pub policy: PolicyKind,

    /// Game configuration; its seed also seeds the policy and the memory
    pub game_config: GameConfig,
}

impl CollectConfig {
    /// Create a collection configuration with defaults
    ///
    /// ```rust
    /// use snake_env::modes::CollectConfig;
    /// use std::path::PathBuf;
    ///
    /// let config = CollectConfig::new(100, PathBuf::from("memory.json"));
    /// assert_eq!(config.memory_capacity, 10_000);
    /// ```
    pub fn new(num_episodes: usize, save_path: PathBuf) -> Self {
        Self {
            num_episodes,
            save_path,
            memory_capacity: 10_000,
            log_frequency: 100,
            append: false,
            policy: PolicyKind::Greedy,
            game_config: GameConfig::default(),
        }
    }
}

/// Totals of a finished episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub reward: f64,
    pub steps: u64,
    pub length: usize,
}

pub struct CollectMode {
    env: SnakeEnvironment,
    policy: Box<dyn Policy>,
    memory: ReplayMemory,
    stats: EpisodeStats,
    config: CollectConfig,
}

impl CollectMode {
    pub fn new(mut config: CollectConfig) -> Result<Self> {
        let seed = *config.game_config.seed.get_or_insert_with(rand::random);

        let env = SnakeEnvironment::new(config.game_config.clone())
            .context("Invalid game configuration")?;
        let policy = config.policy.build(seed.wrapping_add(1));
        let memory = if config.append && config.save_path.exists() {
            let memory = ReplayMemory::from_file(&config.save_path, seed.wrapping_add(2))
                .with_context(|| {
                    format!("Failed to load replay memory from {:?}", config.save_path)
                })?;
            if memory.capacity() != config.memory_capacity {
                warn!(
                    path = ?config.save_path,
                    file_capacity = memory.capacity(),
                    requested_capacity = config.memory_capacity,
                    "appending keeps the capacity stored in the file"
                );
            }
            memory
        } else {
            ReplayMemory::new(config.memory_capacity, seed.wrapping_add(2))
                .context("Invalid replay memory capacity")?
        };

        Ok(Self {
            env,
            policy,
            memory,
            stats: EpisodeStats::new(100),
            config,
        })
    }

    /// Run every episode, then save the memory
    pub fn run(&mut self) -> Result<&EpisodeStats> {
        info!(
            episodes = self.config.num_episodes,
            policy = ?self.config.policy,
            capacity = self.memory.capacity(),
            seed = self.env.engine().seed(),
            width = self.config.game_config.field_width,
            height = self.config.game_config.field_height,
            window = self.config.game_config.window_size,
            "starting collection"
        );

        let log_frequency = self.config.log_frequency.max(1);
        for episode in 0..self.config.num_episodes {
            let summary = self.run_episode()?;
            self.stats
                .record_episode(summary.reward, summary.steps, summary.length);

            if (episode + 1) % log_frequency == 0 {
                info!(
                    "[Episode {}/{}] {}",
                    episode + 1,
                    self.config.num_episodes,
                    self.stats.format_summary()
                );
            }
        }

        self.save_memory()?;

        info!(
            path = ?self.config.save_path,
            stored = self.memory.len(),
            "collection complete: {}",
            self.stats.format_summary()
        );

        Ok(&self.stats)
    }

    /// Play one episode and store its transitions
    pub fn run_episode(&mut self) -> Result<EpisodeSummary> {
        let mut observation = self.env.reset();

        loop {
            let direction = self.policy.select_action(&observation);
            let action = direction.code();
            let (next_observation, reward, done) = self
                .env
                .step(action)
                .context("Policy produced an invalid action")?;

            self.memory.push(Transition {
                state: observation,
                action,
                next_state: (!done).then(|| next_observation.clone()),
                reward,
            });

            if done {
                break;
            }
            observation = next_observation;
        }

        let state = self.env.state();
        let summary = EpisodeSummary {
            reward: state.reward,
            steps: state.steps,
            length: state.len(),
        };
        debug!(?summary, "episode finished");

        Ok(summary)
    }

    fn save_memory(&self) -> Result<()> {
        self.memory.save(&self.config.save_path).with_context(|| {
            format!(
                "Failed to save replay memory to {:?}",
                self.config.save_path
            )
        })
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn small_config(episodes: usize, dir: &TempDir) -> CollectConfig {
        let mut config = CollectConfig::new(episodes, dir.path().join("memory.json"));
        config.game_config = GameConfig::small().with_seed(11);
        config.memory_capacity = 100_000;
        config.log_frequency = 1;
        config
    }

    #[test]
    fn test_collect_config_creation() {
        let config = CollectConfig::new(1000, PathBuf::from("test.json"));
        assert_eq!(config.num_episodes, 1000);
        assert_eq!(config.save_path, PathBuf::from("test.json"));
        assert_eq!(config.policy, PolicyKind::Greedy);
        assert!(!config.append);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = small_config(1, &temp_dir);
        config.memory_capacity = 0;
        assert!(CollectMode::new(config).is_err());
    }

    #[test]
    fn test_run_single_episode() {
        let temp_dir = TempDir::new().unwrap();
        let mut collect = CollectMode::new(small_config(1, &temp_dir)).unwrap();

        let summary = collect.run_episode().unwrap();
        assert!(summary.steps > 0);
        assert_eq!(collect.memory().len() as u64, summary.steps);

        // Exactly the last transition is terminal
        let terminal = collect
            .memory()
            .iter()
            .filter(|t| t.next_state.is_none())
            .count();
        assert_eq!(terminal, 1);
    }

    #[test]
    fn test_run_saves_memory() {
        let temp_dir = TempDir::new().unwrap();
        let config = small_config(3, &temp_dir);
        let save_path = config.save_path.clone();

        let mut collect = CollectMode::new(config).unwrap();
        let total_steps = collect.run().unwrap().total_steps();
        assert_eq!(collect.stats().total_episodes(), 3);

        let loaded = ReplayMemory::from_file(&save_path, 0).unwrap();
        assert_eq!(loaded.capacity(), 100_000);
        assert_eq!(loaded.len() as u64, total_steps);
    }

    #[test]
    fn test_append_keeps_previous_transitions() {
        let temp_dir = TempDir::new().unwrap();
        let mut first = CollectMode::new(small_config(1, &temp_dir)).unwrap();
        first.run().unwrap();
        let stored = first.memory().len();

        let mut config = small_config(1, &temp_dir);
        config.append = true;
        let mut second = CollectMode::new(config).unwrap();
        assert_eq!(second.memory().len(), stored);

        second.run().unwrap();
        assert!(second.memory().len() > stored);
    }

    #[test]
    fn test_append_uses_file_capacity() {
        let temp_dir = TempDir::new().unwrap();
        let mut first = CollectMode::new(small_config(1, &temp_dir)).unwrap();
        first.run().unwrap();

        let mut config = small_config(1, &temp_dir);
        config.append = true;
        config.memory_capacity = 7;
        let second = CollectMode::new(config).unwrap();

        assert_eq!(second.memory().capacity(), 100_000);
    }

    #[test]
    fn test_same_seed_same_episodes() {
        let temp_dir = TempDir::new().unwrap();
        let mut a = CollectMode::new(small_config(1, &temp_dir)).unwrap();
        let mut b = CollectMode::new(small_config(1, &temp_dir)).unwrap();

        for _ in 0..3 {
            assert_eq!(a.run_episode().unwrap(), b.run_episode().unwrap());
        }
    }
}
