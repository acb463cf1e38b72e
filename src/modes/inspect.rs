//! Step-by-step text dump of one episode

use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

use crate::game::{GameConfig, StepResult};
use crate::render::render_text;
use crate::rl::{Policy, PolicyKind, SnakeEnvironment};

/// Plays one episode with a baseline policy and prints every frame
pub struct InspectMode {
    env: SnakeEnvironment,
    policy: Box<dyn Policy>,
    max_steps: u64,
}

impl InspectMode {
    pub fn new(mut game_config: GameConfig, policy: PolicyKind, max_steps: u64) -> Result<Self> {
        let seed = *game_config.seed.get_or_insert_with(rand::random);
        let env = SnakeEnvironment::new(game_config).context("Invalid game configuration")?;

        Ok(Self {
            env,
            policy: policy.build(seed.wrapping_add(1)),
            max_steps,
        })
    }

    /// Write the episode to `out`, returning the number of steps played
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<u64> {
        let mut observation = self.env.reset();
        info!(seed = self.env.engine().seed(), "inspecting episode");

        writeln!(out, "{}\n", render_text(self.env.state()))?;

        while self.env.state().steps < self.max_steps {
            let direction = self.policy.select_action(&observation);
            let result = self.env.step_direction(direction);

            writeln!(out, "{}", Self::describe(self.env.state().steps, direction.code(), &result))?;
            writeln!(out, "{}\n", render_text(self.env.state()))?;

            if result.terminated {
                break;
            }
            observation = result.observation;
        }

        let state = self.env.state();
        writeln!(
            out,
            "total reward {:.0}, length {}, steps {}",
            state.reward,
            state.len(),
            state.steps
        )?;

        Ok(state.steps)
    }

    fn describe(step: u64, action: usize, result: &StepResult) -> String {
        let mut line = format!("step {step}: action {action} reward {:+.0}", result.reward);
        if result.info.ate_food {
            line.push_str(" ate");
        }
        if let Some(collision) = result.info.collision_type {
            line.push_str(&format!(" collision={collision:?}"));
        }
        if result.info.stagnated {
            line.push_str(" stagnated");
        }
        if result.terminated {
            line.push_str(" done");
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_prints_frames_until_done() {
        let mut mode =
            InspectMode::new(GameConfig::small().with_seed(9), PolicyKind::Random, 10_000).unwrap();
        let mut out = Vec::new();

        let steps = mode.run(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(steps > 0);
        assert!(text.contains("step 1: action"));
        assert!(text.contains(" done"));
        assert!(text.contains(&format!("steps {steps}")));
        assert!(text.contains('+'));
    }

    #[test]
    fn test_inspect_respects_step_cap() {
        let mut mode =
            InspectMode::new(GameConfig::small().with_seed(9), PolicyKind::Greedy, 1).unwrap();
        let mut out = Vec::new();

        assert_eq!(mode.run(&mut out).unwrap(), 1);
    }
}
