use proptest::prelude::*;

use rock_shooter::config::Config;
use rock_shooter::entities::*;
use rock_shooter::input::InputSnapshot;
use rock_shooter::GameLoop;

fn input_strategy() -> impl Strategy<Value = InputSnapshot> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(move_left, move_right, fire)| {
        InputSnapshot {
            move_left,
            move_right,
            fire,
            confirm: false,
        }
    })
}

fn delta_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => 0.0f64..100.0,
        1 => Just(f64::NAN),
        1 => -50.0f64..0.0,
        1 => 250.0f64..5000.0,
    ]
}

proptest! {
    #[test]
    fn idle_player_never_moves(seed in any::<u64>(), deltas in prop::collection::vec(delta_strategy(), 1..200)) {
        let mut game = GameLoop::new(Config { seed: Some(seed), ..Config::default() }).unwrap();
        let x = game.state().player.x;
        for d in deltas {
            game.tick(d, &InputSnapshot::default());
            prop_assert_eq!(game.state().player.x, x);
        }
    }

    #[test]
    fn player_stays_in_bounds(
        seed in any::<u64>(),
        frames in prop::collection::vec((input_strategy(), delta_strategy()), 1..300),
    ) {
        let mut game = GameLoop::new(Config { seed: Some(seed), ..Config::default() }).unwrap();
        for (input, d) in frames {
            game.tick(d, &input);
            let s = game.state();
            prop_assert!(s.player.x >= s.min_player_x());
            prop_assert!(s.player.x <= s.max_player_x());
        }
    }

    #[test]
    fn collections_stay_inside_playfield(
        seed in any::<u64>(),
        frames in prop::collection::vec((input_strategy(), delta_strategy()), 1..300),
    ) {
        let config = Config { seed: Some(seed), ..Config::default() };
        let margin = config.projectile_top_margin;
        let mut game = GameLoop::new(config).unwrap();
        for (input, d) in frames {
            game.tick(d, &input);
            let s = game.state();
            prop_assert!(s.obstacles.iter().all(|o| o.y < s.height + SIZE));
            prop_assert!(s.projectiles.iter().all(|p| p.y > -margin));
        }
    }

    #[test]
    fn score_is_ten_per_destroyed_obstacle(
        seed in any::<u64>(),
        frames in prop::collection::vec((input_strategy(), 0.0f64..50.0), 1..300),
    ) {
        let mut game = GameLoop::new(Config { seed: Some(seed), ..Config::default() }).unwrap();
        for (input, d) in frames {
            let before = game.state().clone();
            game.tick(d, &input);
            let after = game.state();
            let gained = after.score - before.score;
            prop_assert_eq!(gained % 10, 0);
            // Each hit spends a projectile; at most one is fired per tick.
            prop_assert!((gained / 10) as usize <= before.projectiles.len() + 1);
            if before.run_state == RunState::GameOver {
                prop_assert_eq!(&before, after);
            }
        }
    }
}
