//! App-level composition: tickets plus notifications behind one store.
//!
//! The app reducer routes child actions to child reducers and bridges
//! between them: when a backend outcome lands for the tickets feature, the
//! matching notification is queued in the same transition, so observers
//! never see an outcome applied without its notification (or vice versa).

use std::sync::Arc;
use std::time::Duration;

use smallvec::SmallVec;
use ticketdesk_core::environment::{Clock, IdGenerator};
use ticketdesk_core::{Effect, Reducer};
use ticketdesk_runtime::{EffectHandle, Store, StoreConfig, StoreError};

use crate::backend::TicketBackend;
use crate::notifications::{
    NotificationAction, NotificationEnvironment, NotificationId, NotificationReducer,
    NotificationState,
};
use crate::store::{
    TicketsAction, TicketsEnvironment, TicketsReducer, TicketsState,
};
use crate::types::{CreateTicketDto, FilterUpdate, TicketId, UpdateTicketDto};

/// Combined state of the whole app
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// The tickets feature
    pub tickets: TicketsState,
    /// The notification queue
    pub notifications: NotificationState,
}

/// Union of all feature actions
#[derive(Clone, Debug)]
pub enum AppAction {
    /// An action for the tickets feature
    Tickets(TicketsAction),
    /// An action for the notification queue
    Notifications(NotificationAction),
}

/// Dependencies of the whole app
#[derive(Clone)]
pub struct AppEnvironment {
    tickets: TicketsEnvironment,
    notifications: NotificationEnvironment,
}

impl AppEnvironment {
    /// Assemble the environment from its shared dependencies
    #[must_use]
    pub fn new(
        backend: Arc<dyn TicketBackend>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            tickets: TicketsEnvironment::new(backend),
            notifications: NotificationEnvironment::new(clock, ids),
        }
    }
}

impl std::fmt::Debug for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment").finish_non_exhaustive()
    }
}

/// Reducer routing actions to features and bridging outcomes into
/// notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct AppReducer {
    tickets: TicketsReducer,
    notifications: NotificationReducer,
}

impl AppReducer {
    /// Create the app reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tickets: TicketsReducer::new(),
            notifications: NotificationReducer::new(),
        }
    }
}

/// The notification a tickets event deserves, if any
///
/// Decided against the state *before* the event is applied, so freshness
/// can still be judged: a stale outcome is discarded by the tickets
/// reducer and must not notify either.
fn notification_for(
    action: &TicketsAction,
    tickets: &TicketsState,
) -> Option<NotificationAction> {
    let fresh = |seq: u64| tickets.is_current(seq);
    match action {
        TicketsAction::TicketCreated { seq, .. } if fresh(*seq) => {
            Some(NotificationAction::success("Ticket created successfully"))
        },
        TicketsAction::TicketUpdated { seq, .. } if fresh(*seq) => {
            Some(NotificationAction::success("Ticket updated successfully"))
        },
        TicketsAction::TicketDeleted { seq, deleted, .. } if fresh(*seq) => {
            if *deleted {
                Some(NotificationAction::success("Ticket deleted successfully"))
            } else {
                Some(NotificationAction::error("Ticket not found"))
            }
        },
        TicketsAction::TicketFetched { seq, ticket: None, .. } if fresh(*seq) => {
            Some(NotificationAction::error("Failed to load ticket"))
        },
        TicketsAction::OperationFailed { seq, message, .. } if fresh(*seq) => {
            Some(NotificationAction::error(message.clone()))
        },
        _ => None,
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::Tickets(action) => {
                let notification = notification_for(&action, &state.tickets);

                let mut effects: SmallVec<[Effect<AppAction>; 4]> = self
                    .tickets
                    .reduce(&mut state.tickets, action, &env.tickets)
                    .into_iter()
                    .map(|e| e.map(AppAction::Tickets))
                    .collect();

                if let Some(notification) = notification {
                    effects.extend(
                        self.notifications
                            .reduce(&mut state.notifications, notification, &env.notifications)
                            .into_iter()
                            .map(|e| e.map(AppAction::Notifications)),
                    );
                }

                effects
            },

            AppAction::Notifications(action) => self
                .notifications
                .reduce(&mut state.notifications, action, &env.notifications)
                .into_iter()
                .map(|e| e.map(AppAction::Notifications))
                .collect(),
        }
    }
}

/// The app's store with a typed command surface
///
/// Thin convenience wrapper; anything not covered by a method can go
/// through [`TicketDesk::store`] directly.
#[derive(Clone)]
pub struct TicketDesk {
    store: Store<AppState, AppAction, AppEnvironment, AppReducer>,
}

impl TicketDesk {
    /// Create the app around a backend, clock, and id source
    #[must_use]
    pub fn new(
        backend: Arc<dyn TicketBackend>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self::with_config(backend, clock, ids, StoreConfig::default())
    }

    /// Create the app with custom store configuration
    #[must_use]
    pub fn with_config(
        backend: Arc<dyn TicketBackend>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        config: StoreConfig,
    ) -> Self {
        let environment = AppEnvironment::new(backend, clock, ids);
        Self {
            store: Store::with_config(
                AppState::default(),
                AppReducer::new(),
                environment,
                config,
            ),
        }
    }

    /// The underlying store, for subscriptions and shutdown
    #[must_use]
    pub const fn store(&self) -> &Store<AppState, AppAction, AppEnvironment, AppReducer> {
        &self.store
    }

    /// Read current state via a closure
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        self.store.state(f).await
    }

    /// Fetch the full ticket list
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn load_tickets(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(AppAction::Tickets(TicketsAction::LoadTickets)).await
    }

    /// Fetch a single ticket and select it
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn load_ticket(&self, id: TicketId) -> Result<EffectHandle, StoreError> {
        self.store
            .send(AppAction::Tickets(TicketsAction::LoadTicket { id }))
            .await
    }

    /// Create a new ticket
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn create_ticket(&self, dto: CreateTicketDto) -> Result<EffectHandle, StoreError> {
        self.store
            .send(AppAction::Tickets(TicketsAction::CreateTicket { dto }))
            .await
    }

    /// Partially update a ticket
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn update_ticket(
        &self,
        id: TicketId,
        dto: UpdateTicketDto,
    ) -> Result<EffectHandle, StoreError> {
        self.store
            .send(AppAction::Tickets(TicketsAction::UpdateTicket { id, dto }))
            .await
    }

    /// Delete a ticket
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn delete_ticket(&self, id: TicketId) -> Result<EffectHandle, StoreError> {
        self.store
            .send(AppAction::Tickets(TicketsAction::DeleteTicket { id }))
            .await
    }

    /// Merge a sparse patch into the active filter
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn set_filter(&self, update: FilterUpdate) -> Result<EffectHandle, StoreError> {
        self.store
            .send(AppAction::Tickets(TicketsAction::SetFilter { update }))
            .await
    }

    /// Reset the filter to match-all
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn clear_filter(&self) -> Result<EffectHandle, StoreError> {
        self.store
            .send(AppAction::Tickets(TicketsAction::ClearFilter))
            .await
    }

    /// Change the detail-view selection from cached data
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn select_ticket(&self, id: Option<TicketId>) -> Result<EffectHandle, StoreError> {
        self.store
            .send(AppAction::Tickets(TicketsAction::SelectTicket { id }))
            .await
    }

    /// Dismiss a notification before it expires
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn dismiss_notification(
        &self,
        id: NotificationId,
    ) -> Result<EffectHandle, StoreError> {
        self.store
            .send(AppAction::Notifications(NotificationAction::Dismiss { id }))
            .await
    }

    /// Remove every visible notification
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shutting down.
    pub async fn clear_notifications(&self) -> Result<EffectHandle, StoreError> {
        self.store
            .send(AppAction::Notifications(NotificationAction::Clear))
            .await
    }

    /// Gracefully shut the store down
    ///
    /// # Errors
    ///
    /// Returns an error if in-flight effects do not finish within `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }
}
