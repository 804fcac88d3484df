use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use env_logger::{Env, Target};
use slide_2048::game::{GameConfig, StartMode};
use slide_2048::modes::{HumanMode, ScriptMode};

#[derive(Parser)]
#[command(name = "slide_2048")]
#[command(version, about = "Sliding-tile merge puzzle (2048) in the terminal")]
struct Cli {
    /// How to play
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Grid side length (overrides the config file)
    #[arg(long)]
    size: Option<usize>,

    /// Starting board layout (overrides the config file)
    #[arg(long)]
    start: Option<StartMode>,

    /// RNG seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Moves to play in script mode, e.g. "lurd"
    #[arg(long)]
    moves: Option<String>,

    /// Write logs to this file (`RUST_LOG` sets the filter)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play with arrow keys or WASD
    Human,
    /// Apply --moves and print every board
    Script,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.mode, cli.log_file.as_deref())?;

    let config = build_config(&cli)?;

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config);
            human_mode.run().await?;
        }
        Mode::Script => {
            let Some(moves) = cli.moves.as_deref() else {
                bail!("--moves is required in script mode");
            };
            let mut script_mode = ScriptMode::new(config);
            let stdout = std::io::stdout();
            script_mode.run(moves, &mut stdout.lock())?;
        }
    }

    Ok(())
}

/// Config file first, then command-line overrides
fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_toml(path)?,
        None => GameConfig::default(),
    };

    if let Some(size) = cli.size {
        config.grid_size = size;
    }
    if let Some(start) = cli.start {
        config.start_mode = start;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    config
        .validate()
        .map_err(|msg| anyhow!("Invalid configuration: {msg}"))?;
    Ok(config)
}

/// The TUI owns the terminal, so human mode only logs when given a file.
/// Script mode falls back to stderr.
fn init_logging(mode: &Mode, log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));

    match (log_file, mode) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        (None, Mode::Script) => {
            builder.target(Target::Stderr);
        }
        (None, Mode::Human) => return Ok(()),
    }

    builder.init();
    Ok(())
}
