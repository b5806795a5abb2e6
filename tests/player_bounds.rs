//! Property tests over arbitrary input traces

use proptest::prelude::*;

use wave_shooter::GameConfig;
use wave_shooter::consts::SIM_DT_MS;
use wave_shooter::sim::{GameState, TickInput, tick};

proptest! {
    #[test]
    fn player_stays_on_screen(
        seed in any::<u64>(),
        trace in proptest::collection::vec(any::<(bool, bool, bool)>(), 1..400),
    ) {
        let config = GameConfig::default();
        let max_x = config.screen_width - config.player_width;
        let mut state = GameState::new(config, seed);

        for (move_left, move_right, fire_pressed) in trace {
            let input = TickInput { move_left, move_right, fire_pressed, ..Default::default() };
            let scene = tick(&mut state, &input, SIM_DT_MS);
            let x = state.player.rect.left();
            prop_assert!((0.0..=max_x).contains(&x), "player x {} out of bounds", x);
            prop_assert_eq!(scene.sprites[0].x, x);
            if state.is_over() {
                break;
            }
        }
    }

    #[test]
    fn lives_and_level_invariants_hold(
        seed in any::<u64>(),
        ticks in 1usize..2000,
    ) {
        let mut state = GameState::new(GameConfig::default(), seed);
        let autopilot = TickInput { idle_mode: true, ..Default::default() };
        let mut last_level = state.level;
        for _ in 0..ticks {
            tick(&mut state, &autopilot, SIM_DT_MS);
            prop_assert!(state.level >= last_level);
            prop_assert!(state.level <= last_level + 1);
            prop_assert!(state.lives <= 3);
            last_level = state.level;
            if state.is_over() {
                prop_assert!(state.run_end().is_some());
                break;
            }
        }
    }
}
