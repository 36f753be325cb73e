use std::fs::File;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};
use snake_arcade::audio::Mixer;
use snake_arcade::config::{GameConfig, default_log_path, ensure_parent_dir};
use snake_arcade::context::AppContext;
use snake_arcade::error::AppError;
use snake_arcade::game::GameStateMachine;
use snake_arcade::input::ButtonLayout;
use snake_arcade::scheduler::{SystemClock, TickScheduler};
use snake_arcade::terminal_runtime::{
    TerminalFrontend, TerminalSession, cleanup_terminal_best_effort,
};

#[derive(Debug, Parser)]
#[command(version, about = "Grid-based arcade Snake for the terminal")]
struct Cli {
    /// JSON config file; defaults to the per-user config path when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the tick rate in ticks per second.
    #[arg(long = "tick-rate")]
    tick_rate: Option<u32>,

    /// Override the obstacle target count.
    #[arg(long)]
    obstacles: Option<usize>,

    /// Write a log to the default per-user log path.
    #[arg(long)]
    log: bool,

    /// Write a log to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log level used when logging is enabled.
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("snake-arcade: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    init_logging(&cli)?;

    let mut config = GameConfig::load(cli.config.as_deref())?;
    if let Some(rate) = cli.tick_rate {
        config.tick_rate_hz = rate;
    }
    if let Some(count) = cli.obstacles {
        config.obstacle_count = count;
    }
    let bounds = config.validate()?;
    info!(
        "starting on a {}x{} grid at {} Hz",
        bounds.width, bounds.height, config.tick_rate_hz
    );

    install_panic_hook();

    let session = TerminalSession::enter()?;
    let frontend = TerminalFrontend::new(
        session,
        ButtonLayout::for_screen(config.screen_width),
        config.cell_size,
    );
    let audio = Mixer::new(config.initial_volume);
    let scheduler = TickScheduler::new(config.tick_interval());
    let mut machine = GameStateMachine::new(&config, bounds);
    let mut ctx = AppContext::new(config, bounds, frontend, audio);

    let stats = scheduler.run(&mut machine, &mut ctx, &SystemClock)?;
    info!("exiting after {} ticks", stats.ticks);
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<(), AppError> {
    let path = match (&cli.log_file, cli.log) {
        (Some(path), _) => path.clone(),
        (None, true) => default_log_path(),
        (None, false) => return Ok(()),
    };

    ensure_parent_dir(&path)?;
    WriteLogger::init(cli.log_level, Config::default(), File::create(&path)?)?;
    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal_best_effort();
        default_hook(panic_info);
    }));
}
