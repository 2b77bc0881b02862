/// Drawing layer.
///
/// The game only ever talks to a `Renderer`: a handful of primitives in
/// canvas coordinates (origin top-left, y down).  `render_frame` and
/// `render_game_over` translate a `GameState` into those calls and perform
/// no game logic.

use std::f64::consts::FRAC_PI_4;
use std::io;

use crate::entities::GameState;

pub const PLAYER_GLYPH: &str = "🚀";
pub const OBSTACLE_GLYPH: &str = "🪨";

/// Player sprite tilt, radians (tilted 45° up-right).
pub const PLAYER_ROTATION: f64 = -FRAC_PI_4;

pub const PROJECTILE_WIDTH: f64 = 4.0;
pub const PROJECTILE_HEIGHT: f64 = 10.0;

/// Opacity of the game-over overlay.
pub const OVERLAY_ALPHA: f64 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Composite `self` over `under` with the given opacity.
    pub fn over(self, under: Rgb, alpha: f64) -> Rgb {
        let a = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |top: u8, bottom: u8| (top as f64 * a + bottom as f64 * (1.0 - a)).round() as u8;
        Rgb::new(mix(self.r, under.r), mix(self.g, under.g), mix(self.b, under.b))
    }
}

/// Text styles used by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Font {
    /// Sprite-sized serif, used for glyphs and the score.
    Sprite,
    /// 36px sans-serif headline.
    Title,
    /// 18px sans-serif hint line.
    Prompt,
}

/// A drawing surface.  Text and glyphs are horizontally centred on `x`
/// with their top edge at `y`.
pub trait Renderer {
    fn clear(&mut self) -> io::Result<()>;

    /// `rotation` is in radians and turns the glyph about its own centre;
    /// the anchor at (`x`, `y`) stays the top-centre of the unrotated glyph.
    fn draw_glyph_at(&mut self, glyph: &str, x: f64, y: f64, rotation: f64) -> io::Result<()>;

    fn draw_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) -> io::Result<()>;

    fn draw_text(&mut self, text: &str, x: f64, y: f64, font: Font, color: Rgb) -> io::Result<()>;

    /// Cover the whole surface with `color` at opacity `alpha`.
    fn fill_overlay(&mut self, color: Rgb, alpha: f64) -> io::Result<()>;

    /// Show everything drawn since the last `clear`.
    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Public entry points ──────────────────────────────────────────────────────

/// Draw one complete frame of play.
pub fn render_frame<R: Renderer>(renderer: &mut R, state: &GameState) -> io::Result<()> {
    renderer.clear()?;

    renderer.draw_glyph_at(PLAYER_GLYPH, state.player.x, state.player.y, PLAYER_ROTATION)?;

    for p in &state.projectiles {
        renderer.draw_rect(
            p.x - PROJECTILE_WIDTH / 2.0,
            p.y,
            PROJECTILE_WIDTH,
            PROJECTILE_HEIGHT,
            Rgb::YELLOW,
        )?;
    }

    for o in &state.obstacles {
        renderer.draw_glyph_at(OBSTACLE_GLYPH, o.x, o.y, 0.0)?;
    }

    renderer.draw_text(
        &format!("Score: {}", state.score),
        80.0,
        10.0,
        Font::Sprite,
        Rgb::WHITE,
    )
}

/// Dim the current frame and print the game-over banner over it.
pub fn render_game_over<R: Renderer>(renderer: &mut R, state: &GameState) -> io::Result<()> {
    let cx = state.width / 2.0;
    let cy = state.height / 2.0;

    renderer.fill_overlay(Rgb::BLACK, OVERLAY_ALPHA)?;
    renderer.draw_text("GAME OVER", cx, cy - 20.0, Font::Title, Rgb::WHITE)?;
    renderer.draw_text("Press Enter to Restart", cx, cy + 20.0, Font::Prompt, Rgb::WHITE)
}
