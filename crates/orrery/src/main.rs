//! orrery: an animated portfolio page for the terminal.

mod app;
mod cli;
mod content;
mod logging;
mod nav;
mod page;
mod scroll_spy;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use orrery_background::BackgroundOptions;
use orrery_config::Config;
use ratatui::layout::Rect;

use crate::{app::App, cli::Cli, content::Portfolio};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);

    if cli.write_config {
        let path = cli
            .config
            .clone()
            .or_else(Config::default_path)
            .ok_or_else(|| color_eyre::eyre::eyre!("no config directory available"))?;
        config.save_to(&path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let log_path = logging::init(&config.log_level)?;
    log::info!("orrery starting, logging to {}", log_path.display());

    let portfolio = match &config.content {
        Some(path) => Portfolio::load(path)?,
        None => Portfolio::sample(),
    };
    let options = BackgroundOptions {
        registry: config.registry(),
        initial_scene: config.initial_scene.to_string(),
        speed: config.animation.speed,
        star_count: config.animation.star_count,
        fps: config.animation.effective_fps(),
        halo: config.animation.halo,
        rain: config.animation.rain,
        seed: cli.seed,
    };

    let terminal = ratatui::init();
    let result = run(terminal, portfolio, options);
    ratatui::restore();
    result
}

fn run(
    terminal: ratatui::DefaultTerminal,
    portfolio: Portfolio,
    options: BackgroundOptions,
) -> color_eyre::Result<()> {
    execute!(std::io::stdout(), EnableMouseCapture).wrap_err("failed to enable mouse capture")?;
    let size = terminal.size()?;
    let app = App::new(portfolio, options, Rect::new(0, 0, size.width, size.height));
    let result = app.run(terminal);
    execute!(std::io::stdout(), DisableMouseCapture).wrap_err("failed to disable mouse capture")?;
    result
}
