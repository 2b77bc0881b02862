//! The game session: owns the state, the RNG and the input edge detector,
//! and decides how many simulation ticks a frame is worth.

use std::io;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::compute::{self, init_state, sanitize_delta};
use crate::config::{Config, TimestepMode, MAX_SUBSTEPS};
use crate::entities::{GameState, RunState};
use crate::error::Result;
use crate::input::{EdgeDetector, FrameInput, InputSnapshot};
use crate::render::{self, Renderer};

pub struct GameLoop {
    config: Config,
    state: GameState,
    rng: StdRng,
    edges: EdgeDetector,
    /// Unsimulated time carried between frames in fixed-timestep mode.
    accumulator_ms: f64,
    /// A fire press seen on a frame too short for a fixed step.
    unspent_fire: bool,
}

impl GameLoop {
    /// Start a session.  The config is validated first, so a bad value
    /// (e.g. a zero fixed step) is an error here, not a NaN accumulator later.
    pub fn new(config: Config) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: Config, rng: StdRng) -> Result<Self> {
        let config = config.validated()?;
        let state = init_state(&config);
        log::info!(
            "New run on a {}x{} playfield ({:?} timestep)",
            state.width,
            state.height,
            config.timestep
        );
        Ok(Self {
            config,
            state,
            rng,
            edges: EdgeDetector::new(),
            accumulator_ms: 0.0,
            unspent_fire: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Replace the whole state, e.g. to stage a scenario.
    pub fn set_state(&mut self, state: GameState) {
        self.state = state;
    }

    pub fn run_state(&self) -> RunState {
        self.state.run_state
    }

    /// Reset everything to a fresh run.  Calling it twice is harmless.
    pub fn init(&mut self) {
        self.state = init_state(&self.config);
        self.accumulator_ms = 0.0;
        self.unspent_fire = false;
    }

    /// Run exactly one simulation tick of `delta_ms`.
    ///
    /// Once the run is over this changes nothing, however often it is called.
    pub fn tick(&mut self, delta_ms: f64, input: &InputSnapshot) {
        let frame_input = self.edges.update(*input);
        self.step(delta_ms, &frame_input);
    }

    /// Advance by one rendered frame, honouring the configured timestep.
    /// Returns the number of simulation ticks that ran.
    pub fn advance(&mut self, frame_delta_ms: f64, input: &InputSnapshot) -> u32 {
        let frame_input = self.edges.update(*input);
        match self.config.timestep {
            TimestepMode::Variable => {
                self.step(frame_delta_ms, &frame_input);
                1
            }
            TimestepMode::Fixed { step_ms } => {
                let backlog = Some(self.config.fixed_step_backlog_ms());
                let delta = sanitize_delta(frame_delta_ms, backlog);
                self.accumulator_ms += delta;

                let mut steps = 0;
                let mut pending = FrameInput {
                    fire_pressed: frame_input.fire_pressed || self.unspent_fire,
                    ..frame_input
                };
                while self.accumulator_ms >= step_ms && steps < MAX_SUBSTEPS {
                    self.step(step_ms, &pending);
                    // One press fires once, not once per substep.
                    pending = pending.without_edges();
                    self.accumulator_ms -= step_ms;
                    steps += 1;
                }
                if steps == MAX_SUBSTEPS && self.accumulator_ms >= step_ms {
                    log::debug!("Dropping {:.1}ms of backlog", self.accumulator_ms);
                    self.accumulator_ms %= step_ms;
                }
                self.unspent_fire = pending.fire_pressed;
                steps
            }
        }
    }

    fn step(&mut self, delta_ms: f64, input: &FrameInput) {
        if !self.state.is_active() {
            return;
        }
        let next = compute::tick(&self.state, input, delta_ms, &self.config, &mut self.rng);
        if next.score != self.state.score {
            log::debug!("Score {} -> {}", self.state.score, next.score);
        }
        if next.run_state == RunState::GameOver {
            log::info!("Game over after {} ticks, score {}", next.frame, next.score);
        }
        self.state = next;
    }

    /// Restart if the run is over and confirm was just pressed.
    /// Returns `true` when a restart happened.
    pub fn poll_restart(&mut self, input: &InputSnapshot) -> bool {
        let frame_input = self.edges.update(*input);
        if self.state.run_state == RunState::GameOver && frame_input.confirm_pressed {
            self.init();
            // Keys still held from the old run must be pressed afresh.
            self.edges.reset(*input);
            log::info!("Restarted");
            return true;
        }
        false
    }

    pub fn render_frame<R: Renderer>(&self, renderer: &mut R) -> io::Result<()> {
        render::render_frame(renderer, &self.state)
    }

    pub fn render_game_over<R: Renderer>(&self, renderer: &mut R) -> io::Result<()> {
        render::render_game_over(renderer, &self.state)
    }
}
