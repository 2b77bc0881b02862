/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG.

use rand::Rng;

use crate::config::Config;
use crate::entities::{GameState, Obstacle, Player, Projectile, RunState, PLAYER_BOTTOM_GAP, SIZE};
use crate::input::FrameInput;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for the configured playfield.
pub fn init_state(config: &Config) -> GameState {
    let width = config.width.max(SIZE);
    let height = config.height.max(SIZE);
    GameState {
        player: Player {
            x: width / 2.0,
            y: height - SIZE - PLAYER_BOTTOM_GAP,
        },
        projectiles: Vec::new(),
        obstacles: Vec::new(),
        score: 0,
        run_state: RunState::Active,
        spawn_timer_ms: 0.0,
        frame: 0,
        width,
        height,
    }
}

/// Turn a raw frame delta into something safe to integrate with:
/// NaN, infinite and negative deltas become 0.  Finite deltas pass through
/// untouched unless a cap is given.
pub fn sanitize_delta(delta_ms: f64, max_delta_ms: Option<f64>) -> f64 {
    if !delta_ms.is_finite() || delta_ms <= 0.0 {
        return 0.0;
    }
    match max_delta_ms {
        Some(max) => delta_ms.min(max.max(0.0)),
        None => delta_ms,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_left(state: &GameState, distance: f64) -> GameState {
    let new_x = (state.player.x - distance).max(state.min_player_x());
    GameState {
        player: Player {
            x: new_x,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

pub fn move_player_right(state: &GameState, distance: f64) -> GameState {
    let new_x = (state.player.x + distance).min(state.max_player_x());
    GameState {
        player: Player {
            x: new_x,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Fire a projectile from the player's current position.
pub fn player_fire(state: &GameState, config: &Config) -> GameState {
    let mut projectiles = state.projectiles.clone();
    projectiles.push(Projectile {
        x: state.player.x,
        y: state.player.y,
        vy: -config.projectile_speed,
    });
    GameState {
        projectiles,
        ..state.clone()
    }
}

/// Roll a new obstacle just above the top edge.
pub fn spawn_obstacle(state: &GameState, config: &Config, rng: &mut impl Rng) -> Obstacle {
    let span = (state.width - SIZE).max(0.0);
    let x = rng.gen::<f64>() * span + SIZE / 2.0;
    let vy = if config.obstacle_max_speed > config.obstacle_min_speed {
        rng.gen_range(config.obstacle_min_speed..config.obstacle_max_speed)
    } else {
        config.obstacle_min_speed
    };
    Obstacle { x, y: -SIZE, vy }
}

// ── Collision helpers ────────────────────────────────────────────────────────

/// True when `obstacle` overlaps the player's bounding box.
pub fn hits_player(obstacle: &Obstacle, player: &Player) -> bool {
    (obstacle.x - player.x).abs() < SIZE && (obstacle.y - player.y).abs() < SIZE
}

/// True when `projectile` overlaps `obstacle`.
pub fn hits_obstacle(projectile: &Projectile, obstacle: &Obstacle) -> bool {
    (obstacle.x - projectile.x).abs() < SIZE / 2.0 && (obstacle.y - projectile.y).abs() < SIZE / 2.0
}

/// Pair each obstacle with the first unused projectile touching it.
///
/// Returns `(destroyed_obstacles, spent_projectiles)` as index masks.  Every
/// obstacle and every projectile takes part in at most one pair, so the
/// result does not depend on removal order.
pub fn find_projectile_hits(
    obstacles: &[Obstacle],
    projectiles: &[Projectile],
) -> (Vec<bool>, Vec<bool>) {
    let mut destroyed = vec![false; obstacles.len()];
    let mut spent = vec![false; projectiles.len()];

    for (oi, obstacle) in obstacles.iter().enumerate() {
        let hit = projectiles
            .iter()
            .enumerate()
            .find(|(pi, p)| !spent[*pi] && hits_obstacle(p, obstacle));
        if let Some((pi, _)) = hit {
            destroyed[oi] = true;
            spent[pi] = true;
        }
    }

    (destroyed, spent)
}

fn keep_unmarked<T: Clone>(items: &[T], marked: &[bool]) -> Vec<T> {
    items
        .iter()
        .zip(marked)
        .filter(|&(_, &m)| !m)
        .map(|(item, _)| item.clone())
        .collect()
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by `delta_ms`.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// A state that is already over is returned unchanged.
pub fn tick(
    state: &GameState,
    input: &FrameInput,
    delta_ms: f64,
    config: &Config,
    rng: &mut impl Rng,
) -> GameState {
    if !state.is_active() {
        return state.clone();
    }

    let dt_ms = sanitize_delta(delta_ms, config.max_frame_delta_ms);
    let dt = dt_ms / 1000.0;

    // ── 1. Move the player ───────────────────────────────────────────────────
    let step = config.player_speed * dt;
    let mut state = state.clone();
    if input.move_left {
        state = move_player_left(&state, step);
    }
    if input.move_right {
        state = move_player_right(&state, step);
    }

    // ── 2. Fire ──────────────────────────────────────────────────────────────
    if input.fire_pressed {
        state = player_fire(&state, config);
    }

    // ── 3. Move projectiles, drop the ones above the top ─────────────────────
    let top = -config.projectile_top_margin;
    let projectiles: Vec<Projectile> = state
        .projectiles
        .iter()
        .map(|p| Projectile {
            y: p.y + p.vy * dt,
            ..p.clone()
        })
        .filter(|p| p.y > top)
        .collect();

    // ── 4. Spawn timer ───────────────────────────────────────────────────────
    let mut spawn_timer_ms = state.spawn_timer_ms + dt_ms;
    let mut obstacles = state.obstacles.clone();
    if spawn_timer_ms > config.spawn_interval_ms {
        spawn_timer_ms = 0.0;
        obstacles.push(spawn_obstacle(&state, config, rng));
    }

    // ── 5. Move obstacles, drop the ones below the bottom ────────────────────
    let bottom = state.height + SIZE;
    let obstacles: Vec<Obstacle> = obstacles
        .iter()
        .map(|o| Obstacle {
            y: o.y + o.vy * dt,
            ..o.clone()
        })
        .filter(|o| o.y < bottom)
        .collect();

    // ── 6a. Collision: obstacles ↔ player ────────────────────────────────────
    let run_state = if obstacles.iter().any(|o| hits_player(o, &state.player)) {
        RunState::GameOver
    } else {
        RunState::Active
    };

    // ── 6b. Collision: projectiles ↔ obstacles ───────────────────────────────
    let (destroyed, spent) = find_projectile_hits(&obstacles, &projectiles);
    let hits = destroyed.iter().filter(|&&d| d).count() as u32;
    let obstacles = keep_unmarked(&obstacles, &destroyed);
    let projectiles = keep_unmarked(&projectiles, &spent);

    GameState {
        projectiles,
        obstacles,
        score: state.score.saturating_add(hits.saturating_mul(config.points_per_hit)),
        run_state,
        spawn_timer_ms,
        frame: state.frame + 1,
        ..state
    }
}
