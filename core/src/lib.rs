//! # ticketdesk core
//!
//! Core traits and types for the ticketdesk reducer architecture.
//!
//! This crate provides the fundamental abstractions for building the ticket
//! tracker as a state container with explicit side effects:
//!
//! - **State**: owned domain state for a feature
//! - **Action**: all possible inputs to a reducer (commands and result events)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side effect descriptions (not execution)
//! - **Environment**: injected dependencies via traits
//!
//! ## Architecture principles
//!
//! - Functional core, imperative shell
//! - Unidirectional data flow
//! - Explicit effects (no hidden I/O)
//! - Dependency injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use ticketdesk_core::*;
//!
//! impl Reducer for TicketsReducer {
//!     type State = TicketsState;
//!     type Action = TicketsAction;
//!     type Environment = TicketsEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TicketsState,
//!         action: TicketsAction,
//!         env: &TicketsEnvironment,
//!     ) -> SmallVec<[Effect<TicketsAction>; 4]> {
//!         // Business logic goes here
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub use effect::Effect;
pub use reducer::Reducer;

/// Reducer module - the core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all state transitions and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: the domain state this reducer operates on
    /// - `Action`: the action type this reducer processes
    /// - `Environment`: the injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for NotificationReducer {
    ///     type State = NotificationState;
    ///     type Action = NotificationAction;
    ///     type Environment = NotificationEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut Self::State,
    ///         action: Self::Action,
    ///         env: &Self::Environment,
    ///     ) -> SmallVec<[Effect<Self::Action>; 4]> {
    ///         // ...
    ///         SmallVec::new()
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most actions produce at most a handful of effects, so the return
        /// type is a `SmallVec` that stays on the stack in the common case.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects describe side effects to be performed by the runtime. They are
/// values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// A boxed future producing an optional feedback action.
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: the action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (notification expiry, timeouts)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back into
        /// the reducer.
        Future(EffectFuture<Action>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Transform the action type produced by this effect
        ///
        /// Used when embedding a child reducer's effects into a parent action
        /// space: the parent maps each child effect with its action
        /// constructor.
        ///
        /// ```ignore
        /// let parent_effect = child_effect.map(AppAction::Notifications);
        /// ```
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            Action: Send + 'static,
            B: Send + 'static,
            F: Fn(Action) -> B + Clone + Send + Sync + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => Effect::Parallel(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Sequential(effects) => Effect::Sequential(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected via
/// the Environment parameter, so reducers stay deterministic under test.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Production uses [`SystemClock`]; tests use a fixed clock so that
    /// timestamps are reproducible.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock - returns the actual current time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Id generator trait - abstracts unique id generation
    ///
    /// Entities and notifications need fresh opaque ids. Production uses
    /// random UUIDs; tests use a sequential generator so ids are predictable.
    pub trait IdGenerator: Send + Sync {
        /// Generate a fresh unique id
        fn next_id(&self) -> String;
    }

    /// UUID v4 based id generator
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidIdGenerator;

    impl IdGenerator for UuidIdGenerator {
        fn next_id(&self) -> String {
            uuid::Uuid::new_v4().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum ChildAction {
        Ping,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum ParentAction {
        Child(ChildAction),
    }

    #[test]
    fn map_rewraps_delay_actions() {
        let effect = Effect::Delay {
            duration: Duration::from_secs(5),
            action: Box::new(ChildAction::Ping),
        };

        let mapped = effect.map(ParentAction::Child);

        match mapped {
            Effect::Delay { duration, action } => {
                assert_eq!(duration, Duration::from_secs(5));
                assert_eq!(*action, ParentAction::Child(ChildAction::Ping));
            },
            other => panic!("expected Delay, got {other:?}"),
        }
    }

    #[test]
    fn merge_and_chain_group_effects() {
        let merged = Effect::merge(vec![Effect::<ChildAction>::None, Effect::None]);
        match merged {
            Effect::Parallel(effects) => assert_eq!(effects.len(), 2),
            other => panic!("expected Parallel, got {other:?}"),
        }

        let chained = Effect::chain(vec![Effect::<ChildAction>::None]);
        assert!(matches!(chained, Effect::Sequential(effects) if effects.len() == 1));
    }

    #[test]
    fn map_preserves_none() {
        let effect: Effect<ChildAction> = Effect::None;
        assert!(matches!(effect.map(ParentAction::Child), Effect::None));
    }

    #[tokio::test]
    async fn map_rewraps_future_output() {
        let effect: Effect<ChildAction> =
            Effect::Future(Box::pin(async { Some(ChildAction::Ping) }));

        let Effect::Future(fut) = effect.map(ParentAction::Child) else {
            panic!("expected Future");
        };
        assert_eq!(fut.await, Some(ParentAction::Child(ChildAction::Ping)));
    }

    #[test]
    fn system_clock_advances() {
        use super::environment::{Clock, SystemClock};
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn uuid_ids_are_unique() {
        use super::environment::{IdGenerator, UuidIdGenerator};
        let ids = UuidIdGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
