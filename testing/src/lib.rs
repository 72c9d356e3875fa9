//! # ticketdesk testing
//!
//! Testing utilities and helpers for the ticketdesk reducer architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A fluent Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use ticketdesk_testing::{ReducerTest, assertions, test_clock};
//!
//! ReducerTest::new(NotificationReducer)
//!     .with_env(test_environment())
//!     .given_state(NotificationState::default())
//!     .when_action(NotificationAction::Clear)
//!     .then_state(|state| assert!(state.entries().is_empty()))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use ticketdesk_core::environment::{Clock, IdGenerator};

/// Mock implementations of Environment traits
pub mod mocks {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    use chrono::Duration;

    use super::{Clock, DateTime, IdGenerator, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ticketdesk_testing::mocks::FixedClock;
    /// use ticketdesk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now()); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Clock that advances by a fixed step on every reading
    ///
    /// Use when a test needs successive timestamps to be strictly
    /// increasing, e.g. to observe an `updated_at` move past the creation
    /// time, while staying fully deterministic.
    ///
    /// # Example
    ///
    /// ```
    /// use ticketdesk_testing::mocks::{SteppingClock, test_clock};
    /// use ticketdesk_core::environment::Clock;
    /// use chrono::Duration;
    ///
    /// let clock = SteppingClock::new(test_clock().now(), Duration::seconds(1));
    /// assert!(clock.now() < clock.now());
    /// ```
    #[derive(Debug)]
    pub struct SteppingClock {
        current: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Create a clock that starts at `start` and advances by `step`
        /// after each `now()` call
        #[must_use]
        pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                current: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        #[allow(clippy::unwrap_used)] // mutex poisoning is unrecoverable
        fn now(&self) -> DateTime<Utc> {
            let mut current = self.current.lock().unwrap();
            let now = *current;
            *current = now + self.step;
            now
        }
    }

    /// Sequential id generator for predictable ids in tests
    ///
    /// Produces `"id-1"`, `"id-2"`, ... in order.
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        counter: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a new generator starting at `id-1`
        #[must_use]
        pub const fn new() -> Self {
            Self {
                counter: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            format!("id-{n}")
        }
    }
}

/// Fluent Given-When-Then harness for reducers
pub mod reducer_test {
    #![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

    use ticketdesk_core::{effect::Effect, reducer::Reducer};

    /// Type alias for state assertion functions
    type StateAssertion<S> = Box<dyn FnOnce(&S)>;

    /// Type alias for effect assertion functions
    type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

    /// Fluent API for testing reducers with Given-When-Then syntax
    ///
    /// # Example
    ///
    /// ```ignore
    /// ReducerTest::new(TicketsReducer::new())
    ///     .with_env(test_environment())
    ///     .given_state(TicketsState::default())
    ///     .when_action(TicketsAction::ClearFilter)
    ///     .then_state(|state| {
    ///         assert!(state.filter().is_empty());
    ///     })
    ///     .run();
    /// ```
    pub struct ReducerTest<R, S, A, E>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        reducer: R,
        environment: Option<E>,
        initial_state: Option<S>,
        action: Option<A>,
        state_assertions: Vec<StateAssertion<S>>,
        effect_assertions: Vec<EffectAssertion<A>>,
    }

    impl<R, S, A, E> ReducerTest<R, S, A, E>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        /// Create a new reducer test with the given reducer
        #[must_use]
        pub const fn new(reducer: R) -> Self {
            Self {
                reducer,
                environment: None,
                initial_state: None,
                action: None,
                state_assertions: Vec::new(),
                effect_assertions: Vec::new(),
            }
        }

        /// Set the environment for the test
        #[must_use]
        pub fn with_env(mut self, env: E) -> Self {
            self.environment = Some(env);
            self
        }

        /// Set the initial state (Given)
        #[must_use]
        pub fn given_state(mut self, state: S) -> Self {
            self.initial_state = Some(state);
            self
        }

        /// Set the action to test (When)
        #[must_use]
        pub fn when_action(mut self, action: A) -> Self {
            self.action = Some(action);
            self
        }

        /// Add an assertion about the resulting state (Then)
        #[must_use]
        pub fn then_state<F>(mut self, assertion: F) -> Self
        where
            F: FnOnce(&S) + 'static,
        {
            self.state_assertions.push(Box::new(assertion));
            self
        }

        /// Add an assertion about the resulting effects (Then)
        #[must_use]
        pub fn then_effects<F>(mut self, assertion: F) -> Self
        where
            F: FnOnce(&[Effect<A>]) + 'static,
        {
            self.effect_assertions.push(Box::new(assertion));
            self
        }

        /// Run the test and execute all assertions
        ///
        /// # Panics
        ///
        /// Panics if initial state, action, or environment is not set,
        /// or if any assertions fail.
        #[allow(clippy::expect_used)] // Test code can use expect
        pub fn run(self) {
            let mut state = self
                .initial_state
                .expect("Initial state must be set with given_state()");

            let action = self.action.expect("Action must be set with when_action()");

            let env = self
                .environment
                .expect("Environment must be set with with_env()");

            let effects = self.reducer.reduce(&mut state, action, &env);

            for assertion in self.state_assertions {
                assertion(&state);
            }

            for assertion in self.effect_assertions {
                assertion(&effects);
            }
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use ticketdesk_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if effects is not empty.
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.is_empty() || matches!(effects, [Effect::None]),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }

    /// Assert that effects contain at least one Delay effect
    ///
    /// # Panics
    ///
    /// Panics if no Delay effect is found.
    pub fn assert_has_delay_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Delay { .. })),
            "Expected at least one Delay effect, but none found"
        );
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SequentialIdGenerator, SteppingClock, test_clock};
pub use reducer_test::ReducerTest;

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::{SmallVec, smallvec};
    use ticketdesk_core::{effect::Effect, reducer::Reducer};

    #[test]
    fn fixed_clock_is_deterministic() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn stepping_clock_advances_per_reading() {
        use chrono::Duration;
        use ticketdesk_core::environment::Clock;

        let clock = SteppingClock::new(test_clock().now(), Duration::seconds(1));
        let first = clock.now();
        let second = clock.now();
        assert_eq!(first, test_clock().now());
        assert_eq!(second - first, Duration::seconds(1));
    }

    #[test]
    fn sequential_ids_are_predictable() {
        use ticketdesk_core::environment::IdGenerator;
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.next_id(), "id-1");
        assert_eq!(ids.next_id(), "id-2");
    }

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Decrement,
    }

    struct TestReducer;

    struct TestEnv;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.count -= 1;
                    smallvec![Effect::None]
                },
            }
        }
    }

    #[test]
    fn reducer_test_runs_assertions() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn reducer_test_decrement() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 5 })
            .when_action(TestAction::Decrement)
            .then_state(|state| {
                assert_eq!(state.count, 4);
            })
            .run();
    }

    #[test]
    fn assertion_helpers() {
        assertions::assert_no_effects::<TestAction>(&[Effect::None]);
        assertions::assert_no_effects::<TestAction>(&[]);
        assertions::assert_effects_count::<TestAction>(&[], 0);
        assertions::assert_effects_count(&[Effect::<TestAction>::None], 1);
    }
}
