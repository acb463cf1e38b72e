use crate::game::{
    ActionError, ConfigError, Direction, GameConfig, GameEngine, GameState, StepResult,
};

/// Snake environment for reinforcement learning
///
/// Wraps the game engine together with the state of the running episode and
/// provides the usual RL interface:
/// - Flat `f32` observations (see [`crate::game::observation`])
/// - Discrete action space of 4 absolute headings
/// - `reset` / `step`
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
}

impl SnakeEnvironment {
    /// Create a new Snake environment
    ///
    /// The first episode uses the configured field size; later resets honor
    /// `random_field_size`.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let mut engine = GameEngine::new(config)?;
        let state = engine.reset(false);
        Ok(Self { engine, state })
    }

    /// Reset the environment and return initial observation
    pub fn reset(&mut self) -> Vec<f32> {
        let random_field_size = self.engine.config().random_field_size;
        self.state = self.engine.reset(random_field_size);
        self.observation()
    }

    /// Step the environment with a discrete action
    ///
    /// Actions:
    /// - 0: Up
    /// - 1: Right
    /// - 2: Down
    /// - 3: Left
    ///
    /// Returns: (observation, tick reward, terminated)
    pub fn step(&mut self, action_idx: usize) -> Result<(Vec<f32>, f32, bool), ActionError> {
        let result = self.engine.step(&mut self.state, action_idx)?;
        Ok((result.observation, result.reward, result.terminated))
    }

    /// Step with a typed heading and keep the full step details
    pub fn step_direction(&mut self, direction: Direction) -> StepResult {
        self.engine.update(&mut self.state, direction)
    }

    /// Get current observation without stepping
    pub fn observation(&self) -> Vec<f32> {
        self.engine.observe(&self.state)
    }

    pub fn observation_len(&self) -> usize {
        self.engine.observation_len()
    }

    /// Get reference to current game state (for rendering/debugging)
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, Point};

    fn env(config: GameConfig) -> SnakeEnvironment {
        SnakeEnvironment::new(config.with_seed(17)).unwrap()
    }

    #[test]
    fn test_environment_creation() {
        let env = env(GameConfig::default());

        assert_eq!(env.state().len(), 1);
        assert_eq!(env.state().steps, 0);
        assert_eq!(env.state().field_size, Point::new(20, 20));
        assert_eq!(env.observation().len(), env.observation_len());
    }

    #[test]
    fn test_invalid_config() {
        assert!(SnakeEnvironment::new(GameConfig::new(10, 0)).is_err());
    }

    #[test]
    fn test_reset_returns_valid_observation() {
        let mut env = env(GameConfig::default().with_window_size(5));
        let obs = env.reset();
        assert_eq!(obs.len(), 6 + 25);
    }

    #[test]
    fn test_step_with_directional_actions() {
        let mut env = env(GameConfig::small());

        for action_idx in 0..4 {
            env.reset();
            let (obs, reward, _done) = env.step(action_idx).unwrap();
            assert_eq!(obs.len(), env.observation_len());
            assert!(reward.is_finite());
            assert_eq!(env.state().direction.code(), action_idx);
        }
    }

    #[test]
    fn test_invalid_action_fails() {
        let mut env = env(GameConfig::small());
        assert_eq!(env.step(4), Err(ActionError(4)));
        assert_eq!(env.state().steps, 0);
    }

    #[test]
    fn test_random_field_size_on_reset() {
        let config = GameConfig {
            random_field_size: true,
            ..GameConfig::small()
        };
        let mut env = env(config);
        assert_eq!(env.state().field_size, Point::new(10, 10));

        for _ in 0..10 {
            env.reset();
            let size = env.state().field_size;
            assert!((10..=30).contains(&size.x));
            assert!((10..=30).contains(&size.y));
        }
    }

    #[test]
    fn test_run_into_wall_terminates() {
        let mut env = env(GameConfig::small());
        env.reset();

        // Start column is 5 on a 10 wide field: the fifth step right hits x = 10
        let mut last = None;
        for _ in 0..5 {
            let result = env.step_direction(Direction::Right);
            last = Some(result.clone());
            if result.terminated {
                break;
            }
        }

        let result = last.unwrap();
        assert!(result.terminated);
        assert_eq!(result.reward, -1.0);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
    }

    #[test]
    fn test_multiple_episodes() {
        let mut env = env(GameConfig::small());

        for _ in 0..2 {
            env.reset();
            let mut steps = 0;
            let mut done = false;

            while !done && steps < 100 {
                let (_obs, _reward, terminated) = env.step(1).unwrap();
                done = terminated;
                steps += 1;
            }

            assert!(done);
            assert_eq!(env.state().steps, steps);
        }
    }
}
