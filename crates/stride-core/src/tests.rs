//! Unit tests for stride-core primitives.

#[cfg(test)]
mod ids {
    use crate::ActorId;

    #[test]
    fn display_and_conversion() {
        assert_eq!(ActorId::from(7).to_string(), "actor#7");
        assert!(ActorId(1) < ActorId(2));
    }
}

#[cfg(test)]
mod cell {
    use crate::{Cell, CellDelta};

    #[test]
    fn delta_arithmetic() {
        let a = Cell::new(2, 3);
        let b = Cell::new(5, 1);
        let d = a.delta_to(b);
        assert_eq!(d, CellDelta { dx: 3, dy: -2 });
        assert_eq!(a + d, b);
        assert!(a.delta_to(a).is_zero());
    }

    #[test]
    fn adjacency() {
        let c = Cell::new(0, 0);
        assert!(c.is_adjacent(Cell::new(1, 1)));
        assert!(c.is_adjacent(Cell::new(-1, 0)));
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Cell::new(2, 0)));
    }

    #[test]
    fn extreme_coordinates_saturate() {
        let low = Cell::new(i32::MIN, i32::MIN);
        let high = Cell::new(i32::MAX, i32::MAX);
        assert_eq!(low.delta_to(high), CellDelta { dx: i32::MAX, dy: i32::MAX });
        assert_eq!(high.delta_to(low), CellDelta { dx: i32::MIN, dy: i32::MIN });
        assert_eq!(high + CellDelta { dx: 1, dy: 0 }, high);
        assert_eq!(low + CellDelta { dx: -1, dy: -1 }, low);
        assert!(!low.is_adjacent(high));
        assert!(!high.is_adjacent(low));
    }
}

#[cfg(test)]
mod time {
    use crate::{Clock, ManualClock, SystemClock, Timestamp};

    #[test]
    fn timestamp_arithmetic() {
        let t = Timestamp(100);
        assert_eq!(t + 50, Timestamp(150));
        assert_eq!(Timestamp(150).saturating_since(t), 50);
        assert_eq!(t.saturating_since(Timestamp(150)), 0);
        assert_eq!(t.to_string(), "100ms");
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(Timestamp(10));
        assert_eq!(clock.now(), Timestamp(10));
        assert_eq!(clock.advance(5), Timestamp(15));
        clock.set(Timestamp(1_000));
        assert_eq!(clock.now(), Timestamp(1_000));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}

#[cfg(test)]
mod config {
    use crate::{MovementConfig, MovementMode, StrideError};

    #[test]
    fn defaults_are_valid() {
        let config = MovementConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provoke_backoff_factor, 5);
        assert_eq!(config.backoff_interval_ms(), config.step_interval_ms * 5);
    }

    #[test]
    fn zero_interval_rejected() {
        let config = MovementConfig { step_interval_ms: 0, ..MovementConfig::default() };
        assert!(matches!(config.validate(), Err(StrideError::Config(_))));
    }

    #[test]
    fn zero_backoff_rejected() {
        let config = MovementConfig { provoke_backoff_factor: 0, ..MovementConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn mode_u8_roundtrip() {
        for mode in [MovementMode::GroupFollow, MovementMode::SingleActor] {
            assert_eq!(MovementMode::from_u8(mode as u8), mode);
        }
        assert_eq!(MovementMode::from_u8(200), MovementMode::GroupFollow);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = MovementConfig::from_json_str(r#"{ "step_interval_ms": 100 }"#).unwrap();
        assert_eq!(config.step_interval_ms, 100);
        assert_eq!(config.provoke_backoff_factor, 5);
        assert_eq!(config.default_mode, MovementMode::GroupFollow);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_invalid_values_rejected() {
        let result = MovementConfig::from_json_str(r#"{ "step_interval_ms": 0 }"#);
        assert!(matches!(result, Err(StrideError::Config(_))));
        let result = MovementConfig::from_json_str("not json");
        assert!(matches!(result, Err(StrideError::Parse(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_path_loads() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tick_cadence_ms": 8, "default_mode": "SingleActor" }}"#).unwrap();
        let config = MovementConfig::from_json_path(file.path()).unwrap();
        assert_eq!(config.tick_cadence_ms, 8);
        assert_eq!(config.default_mode, MovementMode::SingleActor);
    }
}

#[cfg(test)]
mod pause {
    use std::sync::Arc;
    use std::thread;

    use crate::{Clock, ManualClock, PauseCounter, StrideError, Timestamp};

    fn counter() -> (Arc<ManualClock>, PauseCounter) {
        let clock = Arc::new(ManualClock::new(Timestamp(0)));
        let counter = PauseCounter::new(clock.clone() as Arc<dyn Clock>);
        (clock, counter)
    }

    #[test]
    fn starts_unpaused_without_resume() {
        let (_clock, counter) = counter();
        assert!(!counter.is_paused());
        assert_eq!(counter.take_resume(), None);
    }

    #[test]
    fn nested_pauses_release_in_any_order() {
        let (clock, counter) = counter();
        let a = counter.handle();
        let b = counter.handle();
        a.increment_pause().unwrap();
        b.increment_pause().unwrap();
        assert_eq!(counter.count(), 2);

        a.decrement_pause().unwrap();
        assert!(counter.is_paused());
        assert_eq!(counter.take_resume(), None);

        clock.set(Timestamp(500));
        b.decrement_pause().unwrap();
        assert!(!counter.is_paused());
        assert_eq!(counter.take_resume(), Some(Timestamp(500)));
        // One-shot.
        assert_eq!(counter.take_resume(), None);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "below zero"))]
    fn underflow_is_reported_and_clamped() {
        let (_clock, counter) = counter();
        let handle = counter.handle();
        assert!(matches!(handle.decrement_pause(), Err(StrideError::PauseUnderflow)));
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.take_resume(), None);

        handle.increment_pause().unwrap();
        handle.decrement_pause().unwrap();
        assert!(handle.decrement_pause().is_err());
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn underflow_leaves_count_at_zero() {
        let (_clock, counter) = counter();
        let handle = counter.handle();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handle.decrement_pause()));
        if let Ok(result) = outcome {
            assert!(result.is_err());
        }
        assert_eq!(counter.count(), 0);
        handle.increment_pause().unwrap();
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn repause_before_observation_defers_resume() {
        let (clock, counter) = counter();
        let handle = counter.handle();
        handle.increment_pause().unwrap();
        handle.decrement_pause().unwrap();
        handle.increment_pause().unwrap();
        // Paused again: the stale resume is not observable.
        assert_eq!(counter.take_resume(), None);

        clock.set(Timestamp(900));
        handle.decrement_pause().unwrap();
        assert_eq!(counter.take_resume(), Some(Timestamp(900)));
    }

    #[test]
    fn concurrent_pausers_balance_out() {
        let (_clock, counter) = counter();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let handle = counter.handle();
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        handle.increment_pause().unwrap();
                        handle.decrement_pause().unwrap();
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(counter.count(), 0);
        assert!(counter.take_resume().is_some());
    }
}
