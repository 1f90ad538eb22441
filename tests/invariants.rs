//! Property tests over arbitrary action sequences on the canonical board

use keyquest::{Action, Environment};
use proptest::prelude::*;

fn actions() -> impl Strategy<Value = Vec<Action>> {
    prop::collection::vec(prop::sample::select(Action::ALL.to_vec()), 0..160)
}

proptest! {
    #[test]
    fn agent_stays_in_bounds_and_sets_stay_disjoint(seq in actions()) {
        let mut env = Environment::new();
        let mut state = env.reset();
        for action in seq {
            state = env.step(action);
            prop_assert!(state.agent_pos.row < state.grid_size);
            prop_assert!(state.agent_pos.col < state.grid_size);
            prop_assert!(state.keys_remaining.is_disjoint(&state.collected_keys));
            prop_assert_eq!(
                state.keys_remaining.len() + state.collected_keys.len(),
                state.total_keys
            );
            prop_assert_eq!(state.has_all_keys, state.keys_remaining.is_empty());
        }
    }

    #[test]
    fn collected_keys_never_shrink_and_steps_stay_bounded(seq in actions()) {
        let mut env = Environment::new();
        let mut previous = env.reset();
        for action in seq {
            let state = env.step(action);
            prop_assert!(previous.collected_keys.is_subset(&state.collected_keys));
            prop_assert!(state.steps <= 100);
            if previous.done {
                prop_assert_eq!(&state, &previous);
            } else {
                prop_assert_eq!(state.steps, previous.steps + 1);
                prop_assert_eq!(state.last_action, Some(action));
            }
            previous = state;
        }
    }

    #[test]
    fn cumulative_reward_is_sum_of_step_deltas(seq in actions()) {
        let mut env = Environment::new();
        let mut state = env.reset();
        let mut total = 0.0;
        for action in seq {
            let next = env.step(action);
            total += next.cumulative_reward - state.cumulative_reward;
            state = next;
        }
        prop_assert!((total - state.cumulative_reward).abs() < 1e-9);
    }

    #[test]
    fn terminal_states_have_a_cause(seq in actions()) {
        let mut env = Environment::new();
        let mut state = env.reset();
        for action in seq {
            state = env.step(action);
            if state.done {
                break;
            }
        }
        if state.done {
            let on_trap = state.traps.contains(&state.agent_pos);
            let budget = if state.has_all_keys { 50 } else { 100 };
            prop_assert!(on_trap || state.on_treasure() || state.steps >= budget);
            if state.is_success() {
                prop_assert!(state.has_all_keys);
                prop_assert!(state.on_treasure());
            }
        }
    }

    #[test]
    fn terminal_and_key_rewards_ignore_history(seq in actions()) {
        let mut env = Environment::new();
        let mut previous = env.reset();
        for action in seq {
            let state = env.step(action);
            if previous.done {
                break;
            }
            let delta = state.cumulative_reward - previous.cumulative_reward;
            if state.traps.contains(&state.agent_pos) {
                prop_assert_eq!(delta, -100.0);
            } else if state.on_treasure() && !state.has_all_keys {
                prop_assert_eq!(delta, -200.0);
            } else if state.keys_collected() == previous.keys_collected() + 1 {
                let expected = match (state.has_all_keys, state.steps) {
                    (false, steps) if steps >= 100 => 0.0,
                    (false, _) => 50.0,
                    // Completing the set past the reduced budget also ends the episode
                    (true, steps) if steps >= 50 => 120.0,
                    (true, _) => 150.0,
                };
                prop_assert_eq!(delta, expected);
            }
            previous = state;
        }
    }
}
