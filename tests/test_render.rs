use std::io;

use rock_shooter::compute::init_state;
use rock_shooter::config::Config;
use rock_shooter::entities::*;
use rock_shooter::render::*;
use rock_shooter::GameLoop;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Clear,
    Glyph(String, f64, f64, f64),
    Rect(f64, f64, f64, f64, Rgb),
    Text(String, f64, f64, Font),
    Overlay(Rgb, f64),
    Present,
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Renderer for Recorder {
    fn clear(&mut self) -> io::Result<()> {
        self.calls.push(Call::Clear);
        Ok(())
    }

    fn draw_glyph_at(&mut self, glyph: &str, x: f64, y: f64, rotation: f64) -> io::Result<()> {
        self.calls.push(Call::Glyph(glyph.to_string(), x, y, rotation));
        Ok(())
    }

    fn draw_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) -> io::Result<()> {
        self.calls.push(Call::Rect(x, y, w, h, color));
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, font: Font, _color: Rgb) -> io::Result<()> {
        self.calls.push(Call::Text(text.to_string(), x, y, font));
        Ok(())
    }

    fn fill_overlay(&mut self, color: Rgb, alpha: f64) -> io::Result<()> {
        self.calls.push(Call::Overlay(color, alpha));
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.calls.push(Call::Present);
        Ok(())
    }
}

fn busy_state() -> GameState {
    let mut s = init_state(&Config::default());
    s.score = 30;
    s.projectiles.push(Projectile { x: 100.0, y: 200.0, vy: -400.0 });
    s.obstacles.push(Obstacle { x: 300.0, y: 50.0, vy: 80.0 });
    s.obstacles.push(Obstacle { x: 600.0, y: 90.0, vy: 120.0 });
    s
}

#[test]
fn frame_draws_every_entity_in_order() {
    let mut r = Recorder::default();
    render_frame(&mut r, &busy_state()).unwrap();

    assert_eq!(
        r.calls,
        vec![
            Call::Clear,
            Call::Glyph(PLAYER_GLYPH.to_string(), 400.0, 558.0, PLAYER_ROTATION),
            Call::Rect(98.0, 200.0, 4.0, 10.0, Rgb::YELLOW),
            Call::Glyph(OBSTACLE_GLYPH.to_string(), 300.0, 50.0, 0.0),
            Call::Glyph(OBSTACLE_GLYPH.to_string(), 600.0, 90.0, 0.0),
            Call::Text("Score: 30".to_string(), 80.0, 10.0, Font::Sprite),
        ]
    );
}

#[test]
fn glyphs_share_the_entity_anchor() {
    // Player and obstacle are both anchored at their own position, the same
    // point the collision checks use.
    let mut s = busy_state();
    s.obstacles = vec![Obstacle { x: s.player.x, y: s.player.y, vy: 0.0 }];
    let mut r = Recorder::default();
    render_frame(&mut r, &s).unwrap();
    let anchors: Vec<(f64, f64)> = r
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Glyph(_, x, y, _) => Some((*x, *y)),
            _ => None,
        })
        .collect();
    assert_eq!(anchors, vec![(s.player.x, s.player.y), (s.player.x, s.player.y)]);
}

#[test]
fn frame_does_not_present_by_itself() {
    let mut r = Recorder::default();
    render_frame(&mut r, &busy_state()).unwrap();
    assert!(!r.calls.contains(&Call::Present));
}

#[test]
fn player_is_tilted_45_degrees() {
    assert!((PLAYER_ROTATION.abs() - std::f64::consts::PI / 4.0).abs() < 1e-12);
}

#[test]
fn game_over_overlay_and_banner() {
    let mut r = Recorder::default();
    render_game_over(&mut r, &busy_state()).unwrap();
    assert_eq!(
        r.calls,
        vec![
            Call::Overlay(Rgb::BLACK, OVERLAY_ALPHA),
            Call::Text("GAME OVER".to_string(), 400.0, 280.0, Font::Title),
            Call::Text("Press Enter to Restart".to_string(), 400.0, 320.0, Font::Prompt),
        ]
    );
}

#[test]
fn game_over_can_be_drawn_repeatedly() {
    let mut r = Recorder::default();
    let s = busy_state();
    render_game_over(&mut r, &s).unwrap();
    render_game_over(&mut r, &s).unwrap();
    assert_eq!(r.calls.len(), 6);
    assert_eq!(r.calls[..3], r.calls[3..]);
}

#[test]
fn game_loop_renders_its_state() {
    let game = GameLoop::new(Config {
        seed: Some(1),
        ..Config::default()
    })
    .unwrap();
    let mut r = Recorder::default();
    game.render_frame(&mut r).unwrap();
    assert_eq!(r.calls.first(), Some(&Call::Clear));
    assert_eq!(
        r.calls.last(),
        Some(&Call::Text("Score: 0".to_string(), 80.0, 10.0, Font::Sprite))
    );
}

#[test]
fn rgb_blend() {
    assert_eq!(Rgb::BLACK.over(Rgb::WHITE, 0.0), Rgb::WHITE);
    assert_eq!(Rgb::BLACK.over(Rgb::WHITE, 1.0), Rgb::BLACK);
    assert_eq!(Rgb::BLACK.over(Rgb::new(200, 100, 0), 0.5), Rgb::new(100, 50, 0));
    // Out-of-range alpha is clamped.
    assert_eq!(Rgb::YELLOW.over(Rgb::BLACK, 3.0), Rgb::YELLOW);
    assert_eq!(Rgb::YELLOW.over(Rgb::BLACK, f64::NAN), Rgb::BLACK);
}
