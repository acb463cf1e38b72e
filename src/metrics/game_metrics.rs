use std::time::{Duration, Instant};

/// Session-level numbers for the terminal UI
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    /// Best final cumulative reward of the session
    pub high_score: i64,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    /// Rewards are whole numbers; the fraction, if any, is dropped
    pub fn on_game_over(&mut self, final_reward: f64) {
        self.games_played += 1;
        let score = final_reward as i64;
        if self.games_played == 1 || score > self.high_score {
            self.high_score = score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        let mut metrics = GameMetrics::new();
        for (secs, expected) in [(0, "00:00"), (59, "00:59"), (125, "02:05"), (3661, "61:01")] {
            metrics.elapsed_time = Duration::from_secs(secs);
            assert_eq!(metrics.format_time(), expected);
        }
    }

    #[test]
    fn test_best_reward_only_rises() {
        let mut metrics = GameMetrics::new();

        for reward in [10.0, 5.0, 15.0, -1.0] {
            metrics.on_game_over(reward);
        }

        assert_eq!(metrics.high_score, 15);
        assert_eq!(metrics.games_played, 4);
    }

    #[test]
    fn test_first_game_sets_negative_best() {
        let mut metrics = GameMetrics::new();
        metrics.on_game_over(-4.0);
        assert_eq!(metrics.high_score, -4);

        metrics.on_game_over(-9.0);
        assert_eq!(metrics.high_score, -4);
    }

    #[test]
    fn test_game_start_restarts_clock() {
        let mut metrics = GameMetrics::new();
        let Some(earlier) = metrics.start_time.checked_sub(Duration::from_secs(90)) else {
            return;
        };
        metrics.start_time = earlier;
        metrics.update();
        assert!(metrics.elapsed_time >= Duration::from_secs(90));

        metrics.on_game_start();
        assert_eq!(metrics.elapsed_time, Duration::ZERO);
        metrics.update();
        assert!(metrics.elapsed_time < Duration::from_secs(90));
    }
}
