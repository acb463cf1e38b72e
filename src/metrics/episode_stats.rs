//! Rolling episode statistics for experience collection runs

use std::collections::VecDeque;

/// Episode statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use snake_env::metrics::EpisodeStats;
///
/// let mut stats = EpisodeStats::new(100);
/// stats.record_episode(12.0, 40, 3);
///
/// assert_eq!(stats.total_episodes(), 1);
/// assert_eq!(stats.best_length(), 3);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct EpisodeStats {
    /// Final cumulative rewards (rolling window)
    episode_rewards: VecDeque<f64>,

    /// Episode lengths in steps (rolling window)
    episode_steps: VecDeque<u64>,

    /// Final body lengths (rolling window)
    body_lengths: VecDeque<usize>,

    total_episodes: usize,
    total_steps: u64,
    best_length: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl EpisodeStats {
    /// Create a tracker averaging over the last `window_size` episodes
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_steps: VecDeque::with_capacity(window_size),
            body_lengths: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_steps: 0,
            best_length: 0,
            window_size,
        }
    }

    /// Record the end of an episode
    pub fn record_episode(&mut self, reward: f64, steps: u64, body_length: usize) {
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_steps, steps, self.window_size);
        Self::push_deque(&mut self.body_lengths, body_length, self.window_size);
        self.total_episodes += 1;
        self.total_steps += steps;
        self.best_length = self.best_length.max(body_length);
    }

    pub fn mean_episode_reward(&self) -> f64 {
        Self::mean(self.episode_rewards.iter().copied())
    }

    pub fn mean_episode_steps(&self) -> f64 {
        Self::mean(self.episode_steps.iter().map(|&s| s as f64))
    }

    pub fn mean_body_length(&self) -> f64 {
        Self::mean(self.body_lengths.iter().map(|&l| l as f64))
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Longest body reached in any recorded episode
    pub fn best_length(&self) -> usize {
        self.best_length
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Ep Len: {:.1} | Body: {:.2} | Best Body: {}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_steps(),
            self.mean_body_length(),
            self.best_length,
        )
    }

    fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
        let len = values.len();
        if len == 0 {
            0.0
        } else {
            values.sum::<f64>() / len as f64
        }
    }

    /// Push to a deque with size limit
    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
