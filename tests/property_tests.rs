#[cfg(test)]
mod property_tests {
    use ndarray::{Array1, Array2};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use snake_dqn::agent::td_targets;
    use snake_dqn::encoder::ActionEncoder;
    use snake_dqn::exploration::{argmax, EpsilonGreedy};
    use snake_dqn::replay_buffer::{ExperienceBuffer, Transition};

    fn transition(reward: f32) -> Transition {
        Transition {
            state: Array1::zeros(2),
            action: Array1::from_vec(vec![1.0, 0.0]),
            reward,
            next_state: Array1::zeros(2),
            terminal: false,
        }
    }

    // Distinct action names
    fn action_names_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::hash_set("[a-z]{1,8}", 1..10).prop_map(|set| set.into_iter().collect())
    }

    proptest! {
        #[test]
        fn test_buffer_never_exceeds_capacity(capacity in 1usize..50, inserts in 0usize..200) {
            let mut buffer = ExperienceBuffer::new(capacity).unwrap();
            for i in 0..inserts {
                buffer.remember(transition(i as f32));
                prop_assert!(buffer.len() <= capacity);
            }
            prop_assert_eq!(buffer.len(), inserts.min(capacity));

            // survivors are the most recent inserts, oldest first
            let first_kept = inserts.saturating_sub(capacity);
            for (offset, t) in buffer.iter().enumerate() {
                prop_assert_eq!(t.reward, (first_kept + offset) as f32);
            }
        }

        #[test]
        fn test_sample_always_returns_requested_rows(
            len in 1usize..20,
            batch_size in 1usize..64,
            seed in any::<u64>()
        ) {
            let mut buffer = ExperienceBuffer::new(32).unwrap();
            for i in 0..len {
                buffer.remember(transition(i as f32));
            }
            let mut rng = StdRng::seed_from_u64(seed);
            let batch = buffer.sample(batch_size, &mut rng).unwrap();
            prop_assert_eq!(batch.len(), batch_size);
            for &reward in batch.rewards.iter() {
                prop_assert!(reward >= 0.0 && reward < len as f32);
            }
        }

        #[test]
        fn test_encoding_is_a_bijection(names in action_names_strategy()) {
            let encoder = ActionEncoder::new(names.clone()).unwrap();
            for (index, name) in names.iter().enumerate() {
                let one_hot = encoder.encode(name).unwrap();
                prop_assert_eq!(one_hot.sum(), 1.0);
                prop_assert_eq!(one_hot[index], 1.0);
                prop_assert_eq!(encoder.decode(one_hot.view()).unwrap(), name.as_str());
            }
        }

        #[test]
        fn test_epsilon_decay_is_monotone(
            start in 0.0f32..=1.0,
            min in 0.0f32..=1.0,
            decay in 0.5f32..=1.0,
            steps in 1usize..500
        ) {
            let mut schedule = EpsilonGreedy::new(start, min, decay);
            let mut previous = schedule.epsilon();
            for _ in 0..steps {
                let next = schedule.decay();
                prop_assert!(next <= previous);
                if previous <= min {
                    prop_assert_eq!(next, previous);
                }
                previous = next;
            }
        }

        #[test]
        fn test_argmax_picks_a_maximum(values in prop::collection::vec(-100.0f32..100.0, 1..20)) {
            let array = Array1::from_vec(values.clone());
            let index = argmax(array.view()).unwrap();
            let max = values.iter().cloned().fold(f32::MIN, f32::max);
            prop_assert_eq!(values[index], max);
            prop_assert!(values[..index].iter().all(|&v| v < max));
        }

        #[test]
        fn test_td_targets_only_touch_acted_column_with_reward(
            reward in -10.0f32..10.0,
            gamma in 0.0f32..=1.0,
            acted in 0usize..3
        ) {
            let mut buffer = ExperienceBuffer::new(1).unwrap();
            let mut action = Array1::zeros(3);
            action[acted] = 1.0;
            buffer.remember(Transition {
                state: Array1::zeros(2),
                action,
                reward,
                next_state: Array1::zeros(2),
                terminal: false,
            });
            let mut rng = StdRng::seed_from_u64(0);
            let batch = buffer.sample(1, &mut rng).unwrap();

            let target_values = Array2::from_elem((1, 3), 2.0);
            let policy_values = Array2::from_elem((1, 3), 0.5);
            let targets = td_targets(&batch, target_values.view(), policy_values.view(), gamma).unwrap();

            for column in 0..3 {
                let expected = if column == acted { reward + 0.5 } else { 0.5 };
                prop_assert!((targets[[0, column]] - expected).abs() < 1e-5);
            }
        }
    }
}
