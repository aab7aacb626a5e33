use std::path::PathBuf;

use blockfall_engine::{Game, GameConfig};
use tracing::info;

use crate::{command::play::app::PlayApp, logging, tui::Tui, util};

mod app;
mod input;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Game rules as a JSON file (see `default-config`)
    #[clap(long)]
    pub(crate) config: Option<PathBuf>,
    /// Seed for a reproducible piece sequence
    #[clap(long)]
    pub(crate) seed: Option<u64>,
    /// Write logs to this file (logging is off without it)
    #[clap(long)]
    pub(crate) log_file: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        config,
        seed,
        log_file,
    } = arg;

    if let Some(path) = log_file {
        logging::init_file_logging(path)?;
    }

    let config: GameConfig = match config {
        Some(path) => util::read_json_file("game config", path)?,
        None => GameConfig::default(),
    };
    let game = match seed {
        Some(seed) => Game::with_seed(&config, *seed)?,
        None => Game::from_entropy(&config)?,
    };
    info!(?config, ?seed, "starting play session");

    let mut app = PlayApp::new(game);
    Tui::new().run(&mut app)?;

    let snapshot = app.snapshot();
    info!(
        score = snapshot.score(),
        level = snapshot.level(),
        lines = snapshot.total_cleared_lines(),
        "play session ended"
    );
    Ok(())
}
