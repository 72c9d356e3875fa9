//! Reducer for the tickets feature.

use smallvec::{SmallVec, smallvec};
use ticketdesk_core::{Effect, Reducer};

use super::actions::TicketsAction;
use super::environment::TicketsEnvironment;
use super::state::TicketsState;
use crate::types::TicketFilter;

/// Reducer driving the tickets feature
///
/// Commands mutate synchronous state (filter, selection) directly and turn
/// backend work into `Effect::Future`s; events reconcile backend outcomes
/// into the cache. Every event is fenced: an outcome from an operation
/// that has since been superseded is logged and dropped without touching
/// state.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketsReducer;

impl TicketsReducer {
    /// Create a tickets reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TicketsReducer {
    type State = TicketsState;
    type Action = TicketsAction;
    type Environment = TicketsEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action keeps the flow readable
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // === Commands: backend round-trips ===
            TicketsAction::LoadTickets => {
                let seq = state.begin_operation();
                let backend = env.backend();
                tracing::debug!(seq, "loading tickets");
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match backend.list().await {
                        Ok(tickets) => TicketsAction::TicketsLoaded { seq, tickets },
                        Err(err) => TicketsAction::OperationFailed {
                            seq,
                            message: "Failed to load tickets".to_string(),
                            detail: err.to_string(),
                        },
                    })
                }))]
            },

            TicketsAction::LoadTicket { id } => {
                let seq = state.begin_operation();
                let backend = env.backend();
                tracing::debug!(seq, ticket_id = %id, "loading ticket");
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match backend.get(id.clone()).await {
                        Ok(ticket) => TicketsAction::TicketFetched { seq, id, ticket },
                        Err(err) => TicketsAction::OperationFailed {
                            seq,
                            message: "Failed to load ticket".to_string(),
                            detail: err.to_string(),
                        },
                    })
                }))]
            },

            TicketsAction::CreateTicket { dto } => {
                let seq = state.begin_operation();
                let backend = env.backend();
                tracing::debug!(seq, title = %dto.title, "creating ticket");
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match backend.create(dto).await {
                        Ok(ticket) => TicketsAction::TicketCreated { seq, ticket },
                        Err(err) => TicketsAction::OperationFailed {
                            seq,
                            message: "Failed to create ticket".to_string(),
                            detail: err.to_string(),
                        },
                    })
                }))]
            },

            TicketsAction::UpdateTicket { id, dto } => {
                let seq = state.begin_operation();
                let backend = env.backend();
                tracing::debug!(seq, ticket_id = %id, "updating ticket");
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match backend.update(id, dto).await {
                        Ok(ticket) => TicketsAction::TicketUpdated { seq, ticket },
                        Err(err) => TicketsAction::OperationFailed {
                            seq,
                            message: "Failed to update ticket".to_string(),
                            detail: err.to_string(),
                        },
                    })
                }))]
            },

            TicketsAction::DeleteTicket { id } => {
                let seq = state.begin_operation();
                let backend = env.backend();
                tracing::debug!(seq, ticket_id = %id, "deleting ticket");
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match backend.delete(id.clone()).await {
                        Ok(deleted) => TicketsAction::TicketDeleted { seq, id, deleted },
                        Err(err) => TicketsAction::OperationFailed {
                            seq,
                            message: "Failed to delete ticket".to_string(),
                            detail: err.to_string(),
                        },
                    })
                }))]
            },

            // === Commands: synchronous, no fence involved ===
            TicketsAction::SetFilter { update } => {
                state.filter.apply(update);
                smallvec![Effect::None]
            },

            TicketsAction::ClearFilter => {
                state.filter = TicketFilter::default();
                smallvec![Effect::None]
            },

            TicketsAction::SelectTicket { id } => {
                state.selected = id;
                smallvec![Effect::None]
            },

            // === Events: reconcile backend outcomes ===
            TicketsAction::TicketsLoaded { seq, tickets } => {
                if !state.is_current(seq) {
                    tracing::debug!(seq, "discarding stale ticket list");
                    return smallvec![Effect::None];
                }
                tracing::info!(count = tickets.len(), "tickets loaded");
                state.tickets = tickets;
                state.loading = false;
                smallvec![Effect::None]
            },

            TicketsAction::TicketFetched { seq, id, ticket } => {
                if !state.is_current(seq) {
                    tracing::debug!(seq, ticket_id = %id, "discarding stale fetch");
                    return smallvec![Effect::None];
                }
                state.loading = false;
                match ticket {
                    Some(ticket) => {
                        // Refresh the cached copy in place; a ticket we never
                        // listed is not spliced in, only selected.
                        if let Some(cached) =
                            state.tickets.iter_mut().find(|t| t.id == ticket.id)
                        {
                            *cached = ticket;
                        }
                        state.selected = Some(id);
                    },
                    None => {
                        tracing::warn!(ticket_id = %id, "ticket not found");
                        state.error = Some("Failed to load ticket".to_string());
                    },
                }
                smallvec![Effect::None]
            },

            TicketsAction::TicketCreated { seq, ticket } => {
                if !state.is_current(seq) {
                    tracing::debug!(seq, "discarding stale create result");
                    return smallvec![Effect::None];
                }
                tracing::info!(ticket_id = %ticket.id, "ticket created");
                state.tickets.push(ticket);
                state.loading = false;
                smallvec![Effect::None]
            },

            TicketsAction::TicketUpdated { seq, ticket } => {
                if !state.is_current(seq) {
                    tracing::debug!(seq, "discarding stale update result");
                    return smallvec![Effect::None];
                }
                tracing::info!(ticket_id = %ticket.id, "ticket updated");
                if let Some(cached) = state.tickets.iter_mut().find(|t| t.id == ticket.id) {
                    *cached = ticket;
                }
                state.loading = false;
                smallvec![Effect::None]
            },

            TicketsAction::TicketDeleted { seq, id, deleted } => {
                if !state.is_current(seq) {
                    tracing::debug!(seq, "discarding stale delete result");
                    return smallvec![Effect::None];
                }
                state.loading = false;
                if deleted {
                    tracing::info!(ticket_id = %id, "ticket deleted");
                    state.tickets.retain(|t| t.id != id);
                    if state.selected.as_ref() == Some(&id) {
                        state.selected = None;
                    }
                } else {
                    tracing::warn!(ticket_id = %id, "delete target did not exist");
                    state.error = Some("Ticket not found".to_string());
                }
                smallvec![Effect::None]
            },

            TicketsAction::OperationFailed { seq, message, detail } => {
                if !state.is_current(seq) {
                    tracing::debug!(seq, "discarding stale failure");
                    return smallvec![Effect::None];
                }
                tracing::error!(%detail, "backend operation failed: {message}");
                state.loading = false;
                state.error = Some(message);
                smallvec![Effect::None]
            },
        }
    }
}
