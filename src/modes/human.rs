use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::game::{Direction, GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{RenderStatus, Renderer};

const CONTROLS: [(&str, &str); 3] = [
    ("↑↓←→/WASD", "Move"),
    ("R", "Restart"),
    ("Q/Esc", "Quit"),
];

/// Keyboard play in the terminal
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    game_over: bool,
    should_quit: bool,
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let mut engine = GameEngine::new(config).context("Invalid game configuration")?;
        let state = engine.reset(false);
        info!(seed = engine.seed(), "starting human mode");

        Ok(Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            game_over: false,
            should_quit: false,
            pending_direction: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        // Restore the terminal even when the loop failed
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // 8 Hz game ticks
        let mut tick_timer = interval(Duration::from_millis(125));

        // ~30 FPS redraw
        let mut render_timer = interval(Duration::from_millis(33));

        let status_controls = CONTROLS.to_vec();
        let banner = format!("Seed: {}", self.engine.seed());

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.game_over {
                        self.update_game();
                    }
                }

                _ = render_timer.tick() => {
                    if !self.game_over {
                        self.metrics.update();
                    }
                    let status = RenderStatus {
                        game_over: self.game_over,
                        banner: Some(banner.clone()),
                        controls: status_controls.clone(),
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics, &status);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => self.queue_turn(direction),
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    /// Remember the heading for the next tick, refusing a turn back into the neck
    fn queue_turn(&mut self, direction: Direction) {
        if self.state.len() > 1 && direction.is_opposite(self.state.direction) {
            return;
        }
        self.pending_direction = Some(direction);
    }

    fn update_game(&mut self) {
        let direction = self.pending_direction.take().unwrap_or(self.state.direction);
        let result = self.engine.update(&mut self.state, direction);

        if result.terminated {
            self.game_over = true;
            self.metrics.on_game_over(self.state.reward);
            info!(
                reward = self.state.reward,
                length = self.state.len(),
                steps = self.state.steps,
                "game over"
            );
        }
    }

    fn reset_game(&mut self) {
        let random_field_size = self.engine.config().random_field_size;
        self.state = self.engine.reset(random_field_size);
        self.metrics.on_game_start();
        self.pending_direction = None;
        self.game_over = false;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
