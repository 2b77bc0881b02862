use rock_shooter::input::*;

fn held_fire() -> InputSnapshot {
    InputSnapshot {
        fire: true,
        ..InputSnapshot::default()
    }
}

#[test]
fn fire_edge_only_on_first_held_frame() {
    let mut edges = EdgeDetector::new();
    assert!(edges.update(held_fire()).fire_pressed);
    assert!(!edges.update(held_fire()).fire_pressed);
    assert!(!edges.update(held_fire()).fire_pressed);
}

#[test]
fn release_then_press_fires_again() {
    let mut edges = EdgeDetector::new();
    assert!(edges.update(held_fire()).fire_pressed);
    assert!(!edges.update(InputSnapshot::default()).fire_pressed);
    assert!(edges.update(held_fire()).fire_pressed);
}

#[test]
fn movement_is_level_triggered() {
    let mut edges = EdgeDetector::new();
    let left = InputSnapshot {
        move_left: true,
        ..InputSnapshot::default()
    };
    assert!(edges.update(left).move_left);
    assert!(edges.update(left).move_left);
    assert!(!edges.update(left).move_right);
}

#[test]
fn confirm_edge_is_independent_of_fire() {
    let mut edges = EdgeDetector::new();
    let _ = edges.update(held_fire());
    let both = InputSnapshot {
        fire: true,
        confirm: true,
        ..InputSnapshot::default()
    };
    let input = edges.update(both);
    assert!(input.confirm_pressed);
    assert!(!input.fire_pressed);
}

#[test]
fn reset_swallows_keys_already_down() {
    let mut edges = EdgeDetector::new();
    edges.reset(held_fire());
    assert!(!edges.update(held_fire()).fire_pressed);
}

#[test]
fn without_edges_keeps_movement() {
    let input = FrameInput {
        move_right: true,
        fire_pressed: true,
        confirm_pressed: true,
        ..FrameInput::default()
    };
    let spent = input.without_edges();
    assert!(spent.move_right);
    assert!(!spent.fire_pressed);
    assert!(!spent.confirm_pressed);
}
