//! Terminal sprint runner (default binary).
//!
//! Owns the fixed-cadence loop: read keys, feed the engine, tick every 16 ms, draw a
//! plain-text view. All game state lives in the engine.

mod view;

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tui_sprint::core::{GameConfig, GameEngine, GameEvent};
use tui_sprint::input::{should_quit, KeyBinding, KeyTracker};
use tui_sprint::types::{Command, Phase, TICK_MS};

use crate::view::Screen;

#[derive(Parser, Debug)]
#[command(name = "tui-sprint", about = "Clear the lines as fast as you can")]
struct Args {
    /// JSON config file; missing fields take their defaults.
    #[arg(long, value_name = "path")]
    config: Option<PathBuf>,

    /// Lines to clear.
    #[arg(long)]
    lines: Option<u32>,

    /// Bag seed. If omitted, one is derived from the clock.
    #[arg(long)]
    seed: Option<u32>,

    /// Delayed auto-shift, in ticks.
    #[arg(long)]
    das: Option<u32>,

    /// Auto-repeat rate, in ticks.
    #[arg(long)]
    arr: Option<u32>,

    /// Hide the ghost piece.
    #[arg(long)]
    no_ghost: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout belongs to the view
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = load_config(&args)?;
    let mut engine = GameEngine::new(config).context("creating game engine")?;

    let mut screen = Screen::new();
    screen.enter().context("entering raw mode")?;

    let result = run(&mut screen, &mut engine);

    // Always try to restore terminal state.
    let _ = screen.exit();
    result
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<GameConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if let Some(lines) = args.lines {
        config.sprint_lines = lines;
    }
    if let Some(das) = args.das {
        config.delayed_auto_shift = das;
    }
    if let Some(arr) = args.arr {
        config.auto_repeat_rate = arr;
    }
    if args.no_ghost {
        config.use_ghost_piece = false;
    }
    config.seed = args.seed.or(config.seed).or_else(|| Some(clock_seed()));

    config.validate().context("invalid configuration")?;
    info!(?config, "configuration loaded");
    Ok(config)
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(screen: &mut Screen, engine: &mut GameEngine) -> Result<()> {
    let mut keys = KeyTracker::new();
    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    engine.start();

    loop {
        screen.draw(view::render(&engine.snapshot()))?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press && should_quit(key) {
                        return Ok(());
                    }

                    let (command, binding) = keys.handle_event(key);
                    if let Some(command) = command {
                        forward(engine, command);
                    }
                    match binding {
                        Some(KeyBinding::TogglePause) => toggle_pause(engine, &mut keys),
                        Some(KeyBinding::Restart) => {
                            keys.reset();
                            engine.restart();
                            engine.start();
                        }
                        _ => {}
                    }
                }
                Event::Resize(..) => screen.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            let released = keys.update(TICK_MS);
            step(engine, released);

            for event in engine.drain_events() {
                match event {
                    GameEvent::GameOver { won, elapsed_ms } => {
                        info!(won, elapsed_ms, "sprint finished");
                    }
                    other => debug!(event = ?other, "engine event"),
                }
            }
        }
    }
}

/// Pass a key edge to the engine unless the sprint is over. Returns true if forwarded.
fn forward(engine: &mut GameEngine, command: Command) -> bool {
    if engine.phase() == Phase::GameOver {
        return false;
    }
    engine.apply(command);
    true
}

/// One fixed tick. After the sprint ends the tracker's timed releases are dropped and
/// the engine is left alone until a restart.
fn step<I>(engine: &mut GameEngine, released: I) -> bool
where
    I: IntoIterator<Item = Command>,
{
    if engine.phase() == Phase::GameOver {
        return false;
    }
    engine.tick_with(TICK_MS, released)
}

fn toggle_pause(engine: &mut GameEngine, keys: &mut KeyTracker) {
    match engine.phase() {
        Phase::Falling => {
            keys.reset();
            engine.apply(Command::Pause);
        }
        Phase::Paused => engine.apply(Command::Resume),
        _ => {}
    }
}
