use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_env::game::GameConfig;
use snake_env::modes::{CollectConfig, CollectMode, HumanMode, InspectMode};
use snake_env::rl::PolicyKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_env")]
#[command(version, about = "Snake environment for reinforcement learning")]
struct Cli {
    #[arg(long, value_enum, default_value = "human")]
    mode: Mode,

    /// JSON game configuration; the flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field width
    #[arg(long)]
    width: Option<usize>,

    /// Field height
    #[arg(long)]
    height: Option<usize>,

    /// Side of the observation window around the head (odd)
    #[arg(long)]
    window: Option<usize>,

    /// Seed for every random source of the run
    #[arg(long)]
    seed: Option<u64>,

    /// Draw a new field size from [10, 30] on every reset
    #[arg(long)]
    random_field_size: bool,

    /// Episodes to run (collect)
    #[arg(long, default_value = "1000")]
    episodes: usize,

    /// Replay memory capacity (collect)
    #[arg(long, default_value = "10000")]
    capacity: usize,

    /// Replay memory file (collect)
    #[arg(long, default_value = "data/replay_memory.json")]
    output: PathBuf,

    /// Add to an existing replay memory file instead of replacing it (collect)
    #[arg(long)]
    append: bool,

    /// Log progress every N episodes (collect)
    #[arg(long, default_value = "100")]
    log_every: usize,

    /// Baseline policy (collect, inspect)
    #[arg(long, value_enum, default_value = "greedy")]
    policy: PolicyKind,

    /// Step limit of the inspected episode (inspect)
    #[arg(long, default_value = "500")]
    max_steps: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Fill a replay memory with a baseline policy
    Collect,
    /// Print one episode frame by frame
    Inspect,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)
                .with_context(|| format!("Failed to load game config from {:?}", path))?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.field_width = width;
        }
        if let Some(height) = self.height {
            config.field_height = height;
        }
        if let Some(window) = self.window {
            config.window_size = window;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.random_field_size |= self.random_field_size;

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

/// Logs go to stderr; the terminal UI owns the screen, so human mode is quiet
/// unless `RUST_LOG` says otherwise.
fn init_tracing(mode: Mode) {
    let default_directive = match mode {
        Mode::Human => "off",
        Mode::Collect | Mode::Inspect => "info",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.mode);

    let game_config = cli.game_config()?;

    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(game_config)?;
            human_mode.run().await?;
        }
        Mode::Collect => {
            let mut collect_config = CollectConfig::new(cli.episodes, cli.output);
            collect_config.memory_capacity = cli.capacity;
            collect_config.log_frequency = cli.log_every;
            collect_config.append = cli.append;
            collect_config.policy = cli.policy;
            collect_config.game_config = game_config;

            let mut collect_mode = CollectMode::new(collect_config)?;
            collect_mode.run()?;
        }
        Mode::Inspect => {
            let mut inspect_mode = InspectMode::new(game_config, cli.policy, cli.max_steps)?;
            let stdout = std::io::stdout();
            inspect_mode.run(&mut stdout.lock())?;
        }
    }

    Ok(())
}
