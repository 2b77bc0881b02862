mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};

use display::TerminalRenderer;
use rock_shooter::input::InputSnapshot;
use rock_shooter::render::Renderer;
use rock_shooter::{Config, GameError, GameLoop, TimestepMode};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈128 ms) is
/// refreshed before expiry while the key is repeating.
const HOLD_WINDOW: u64 = 8;

#[derive(Parser)]
#[command(name = "rock_shooter")]
#[command(about = "Shoot the falling rocks before they hit your ship", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON file overriding game parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Simulate in fixed steps of this many milliseconds
    #[arg(long)]
    fixed_step: Option<f64>,

    /// Write logs here (the game owns the terminal, so stderr is unusable)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Setup ─────────────────────────────────────────────────────────────────────

/// Install `env_logger` writing to `path`.  `RUST_LOG` picks the level.
fn init_logging(path: &Path) -> Result<(), GameError> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| GameError::Logger(e.to_string()))
}

fn build_config(cli: &Cli) -> Result<Config, GameError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(step_ms) = cli.fixed_step {
        config.timestep = TimestepMode::Fixed { step_ms };
    }
    config.validated()
}

// ── Input tracking ───────────────────────────────────────────────────────────

/// Maps each held key to the frame it was last seen (press or repeat).
///
/// * **Keyboard-enhancement capable** terminals send `Release` events, so
///   keys are dropped as soon as they go up.
/// * **Classic terminals** only send presses (OS key-repeat shows as
///   repeated presses); keys expire after `HOLD_WINDOW` frames of silence.
#[derive(Default)]
struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
}

impl KeyTracker {
    fn is_held(&self, key: &KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|k| self.is_held(k, frame))
    }

    fn record(&mut self, code: KeyCode, kind: KeyEventKind, frame: u64) {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.key_frame.insert(code, frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
            }
        }
    }

    fn snapshot(&self, frame: u64) -> InputSnapshot {
        InputSnapshot {
            move_left: self.any_held(
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            ),
            move_right: self.any_held(
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            ),
            fire: self.is_held(&KeyCode::Char(' '), frame),
            confirm: self.is_held(&KeyCode::Enter, frame),
        }
    }
}

fn is_quit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Feed one terminal event into the tracker / renderer.
fn handle_event<W: Write>(
    ev: Event,
    keys: &mut KeyTracker,
    renderer: &mut TerminalRenderer<W>,
    frame: u64,
) -> Flow {
    match ev {
        Event::Key(KeyEvent { code, kind, modifiers, .. }) => {
            if kind == KeyEventKind::Press && is_quit_key(code, modifiers) {
                return Flow::Quit;
            }
            keys.record(code, kind, frame);
        }
        Event::Resize(cols, rows) => renderer.resize(cols, rows),
        _ => {}
    }
    Flow::Continue
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn draw<W: Write>(game: &GameLoop, renderer: &mut TerminalRenderer<W>) -> std::io::Result<()> {
    game.render_frame(renderer)?;
    if !game.state().is_active() {
        game.render_game_over(renderer)?;
    }
    renderer.present()
}

/// Runs until the player quits.
///
/// While a run is active: drain pending input, advance by the wall-clock
/// delta, draw, sleep to the next frame boundary.  Once it is over the
/// final frame and the overlay are drawn once and the loop blocks on input
/// until Enter restarts or the player quits.
fn game_loop<W: Write>(
    renderer: &mut TerminalRenderer<W>,
    game: &mut GameLoop,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut keys = KeyTracker::default();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Flow::Quit = handle_event(ev, &mut keys, renderer, frame) {
                return Ok(());
            }
        }

        let now = Instant::now();
        let delta_ms = now.duration_since(last).as_secs_f64() * 1000.0;
        last = now;

        game.advance(delta_ms, &keys.snapshot(frame));
        draw(game, renderer)?;

        if !game.state().is_active() {
            // ── Game over: wait passively for Enter ───────────────────────────
            loop {
                let Ok(ev) = rx.recv() else {
                    return Ok(());
                };
                frame += 1;
                let resized = matches!(ev, Event::Resize(..));
                if let Flow::Quit = handle_event(ev, &mut keys, renderer, frame) {
                    return Ok(());
                }
                if game.poll_restart(&keys.snapshot(frame)) {
                    last = Instant::now();
                    break;
                }
                if resized {
                    draw(game, renderer)?;
                }
            }
            continue;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path).with_context(|| format!("logging to {}", path.display()))?;
    }
    let config = build_config(&cli).context("loading configuration")?;

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events so held keys end exactly on release.
    // Terminals without the kitty protocol fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    log::info!("Keyboard enhancement: {}", keyboard_enhanced);

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                log::warn!("Terminal input closed: {}", e);
                break;
            }
        }
    });

    let result = run(&mut out, config, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, config: Config, rx: &mpsc::Receiver<Event>) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut renderer = TerminalRenderer::new(out, cols, rows, config.width, config.height);
    let mut game = GameLoop::new(config)?;

    game_loop(&mut renderer, &mut game, rx)?;

    log::info!("Quit with score {}", game.state().score);
    Ok(())
}
