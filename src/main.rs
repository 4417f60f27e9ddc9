//! Terminal reaction-time game.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use reaction_state::config::GameConfig;
use reaction_state::terminal::{parse_input, Command, TerminalPresenter};
use reaction_state::{FileStore, ReactionGame, SystemClock, TimerQueue};

/// How long to block on input when no cue is pending.
const IDLE_POLL: Duration = Duration::from_secs(3600);

#[derive(Debug, Parser)]
#[command(name = "reaction", about = "Test your reaction time in the terminal")]
struct Args {
    /// Config file (defaults to ./reaction.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to keep the best time
    #[arg(long)]
    best_time_file: Option<PathBuf>,

    /// Forget the stored best time before playing
    #[arg(long)]
    reset_best: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = GameConfig::load(args.config.as_deref()).context("loading config")?;
    if let Some(path) = args.best_time_file {
        config.best_time_path = path;
    }
    info!(?config, "starting");

    let mut store = FileStore::new(&config.best_time_path);
    if args.reset_best {
        store
            .clear()
            .with_context(|| format!("clearing {}", config.best_time_path.display()))?;
    }

    let mut game = ReactionGame::new(
        TerminalPresenter::new(io::stdout()),
        store,
        TimerQueue::new(SystemClock),
        SystemClock,
    )
    .with_delay_range(config.delay_range());

    // Input only crosses threads as raw lines; the game stays here.
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    game.presenter_mut().render().context("drawing screen")?;

    loop {
        let timeout = game.time_until_next_cue().unwrap_or(IDLE_POLL);

        match rx.recv_timeout(timeout) {
            Ok(line) => match parse_input(&line, game.presenter().screen()) {
                Some(Command::Intent(intent)) => {
                    debug!(%intent, "input");
                    game.handle(intent);
                }
                Some(Command::Quit) => break,
                None => debug!(line = %line, "unrecognised input"),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        game.poll_timers();
        game.presenter_mut().render().context("drawing screen")?;
    }

    info!(best_time_ms = ?game.best_time(), "bye");
    Ok(())
}
