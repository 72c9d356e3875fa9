//! Transient user notifications with automatic expiry.
//!
//! Notifications are queued by the app reducer when backend outcomes land
//! and disappear on their own after [`NOTIFICATION_TTL`], driven by an
//! [`Effect::Delay`] scheduled in the same transition that shows them.
//! Dismissal and expiry are idempotent: removing an id that is already
//! gone is a no-op, so a manual dismiss racing its own expiry timer is
//! harmless.

use std::time::Duration;

use chrono::{DateTime, Utc};
use smallvec::{SmallVec, smallvec};
use ticketdesk_core::environment::{Clock, IdGenerator};
use ticketdesk_core::{Effect, Reducer};
use ticketdesk_macros::Action;

/// How long a notification stays visible before expiring on its own
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Unique identifier for a queued notification
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NotificationId(String);

impl NotificationId {
    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual category of a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    /// An operation completed
    Success,
    /// An operation failed
    Error,
    /// Neutral information
    Info,
    /// Something worth attention but not a failure
    Warn,
}

/// A queued notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Unique id, used for dismissal and expiry
    pub id: NotificationId,
    /// Text shown to the user
    pub message: String,
    /// Visual category
    pub kind: NotificationKind,
    /// When the notification was queued
    pub timestamp: DateTime<Utc>,
}

/// Queue of currently visible notifications, oldest first
#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    entries: Vec<Notification>,
}

impl NotificationState {
    /// Currently visible notifications, oldest first
    #[must_use]
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Number of visible notifications
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is visible
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything that can happen to the notification queue
#[derive(Action, Clone, Debug)]
pub enum NotificationAction {
    /// Queue a notification and schedule its expiry
    #[command]
    Show {
        /// Text shown to the user
        message: String,
        /// Visual category
        kind: NotificationKind,
    },

    /// Remove a notification before it expires
    #[command]
    Dismiss {
        /// Notification to remove; absent ids are ignored
        id: NotificationId,
    },

    /// Remove every visible notification
    #[command]
    Clear,

    /// A notification's display time ran out
    #[event]
    Expired {
        /// Notification to remove; absent ids are ignored
        id: NotificationId,
    },
}

impl NotificationAction {
    /// Queue a success notification
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::Show {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    /// Queue an error notification
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Show {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }

    /// Queue an info notification
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::Show {
            message: message.into(),
            kind: NotificationKind::Info,
        }
    }

    /// Queue a warning notification
    #[must_use]
    pub fn warn(message: impl Into<String>) -> Self {
        Self::Show {
            message: message.into(),
            kind: NotificationKind::Warn,
        }
    }
}

/// Dependencies of the notification reducer
#[derive(Clone)]
pub struct NotificationEnvironment {
    clock: std::sync::Arc<dyn Clock>,
    ids: std::sync::Arc<dyn IdGenerator>,
}

impl NotificationEnvironment {
    /// Create an environment from a clock and id source
    #[must_use]
    pub fn new(
        clock: std::sync::Arc<dyn Clock>,
        ids: std::sync::Arc<dyn IdGenerator>,
    ) -> Self {
        Self { clock, ids }
    }
}

impl std::fmt::Debug for NotificationEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationEnvironment").finish_non_exhaustive()
    }
}

/// Reducer driving the notification queue
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationReducer;

impl NotificationReducer {
    /// Create a notification reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for NotificationReducer {
    type State = NotificationState;
    type Action = NotificationAction;
    type Environment = NotificationEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            NotificationAction::Show { message, kind } => {
                let id = NotificationId(env.ids.next_id());
                tracing::debug!(notification_id = %id, ?kind, "showing notification");
                state.entries.push(Notification {
                    id: id.clone(),
                    message,
                    kind,
                    timestamp: env.clock.now(),
                });
                smallvec![Effect::Delay {
                    duration: NOTIFICATION_TTL,
                    action: Box::new(NotificationAction::Expired { id }),
                }]
            },

            NotificationAction::Dismiss { id } | NotificationAction::Expired { id } => {
                state.entries.retain(|n| n.id != id);
                smallvec![Effect::None]
            },

            NotificationAction::Clear => {
                state.entries.clear();
                smallvec![Effect::None]
            },
        }
    }
}
