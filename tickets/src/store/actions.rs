//! Actions for the tickets feature.

use ticketdesk_macros::Action;

use crate::types::{CreateTicketDto, FilterUpdate, Ticket, TicketId, UpdateTicketDto};

/// Everything that can happen to the tickets feature
///
/// Commands express user intent and may launch backend round-trips.
/// Events report the outcome of a round-trip; each carries the fence
/// sequence of the operation that produced it so stale outcomes can be
/// recognized and dropped.
#[derive(Action, Clone, Debug)]
pub enum TicketsAction {
    /// Fetch the full ticket list from the backend
    #[command]
    LoadTickets,

    /// Fetch a single ticket and select it
    #[command]
    LoadTicket {
        /// Ticket to fetch
        id: TicketId,
    },

    /// Create a new ticket
    #[command]
    CreateTicket {
        /// Creation payload
        dto: CreateTicketDto,
    },

    /// Partially update an existing ticket
    #[command]
    UpdateTicket {
        /// Ticket to update
        id: TicketId,
        /// Fields to change
        dto: UpdateTicketDto,
    },

    /// Delete a ticket
    #[command]
    DeleteTicket {
        /// Ticket to delete
        id: TicketId,
    },

    /// Merge a sparse patch into the active filter
    #[command]
    SetFilter {
        /// Fields of the filter to change
        update: FilterUpdate,
    },

    /// Reset the filter to match-all
    #[command]
    ClearFilter,

    /// Change the detail-view selection from already-cached data
    #[command]
    SelectTicket {
        /// Ticket to select, or `None` to clear the selection
        id: Option<TicketId>,
    },

    /// The backend returned the full ticket list
    #[event]
    TicketsLoaded {
        /// Fence sequence of the originating command
        seq: u64,
        /// Fresh snapshot replacing the cache
        tickets: Vec<Ticket>,
    },

    /// The backend answered a single-ticket fetch
    #[event]
    TicketFetched {
        /// Fence sequence of the originating command
        seq: u64,
        /// Id that was requested
        id: TicketId,
        /// The ticket, or `None` if it does not exist
        ticket: Option<Ticket>,
    },

    /// The backend created a ticket
    #[event]
    TicketCreated {
        /// Fence sequence of the originating command
        seq: u64,
        /// The created ticket with its assigned id
        ticket: Ticket,
    },

    /// The backend updated a ticket
    #[event]
    TicketUpdated {
        /// Fence sequence of the originating command
        seq: u64,
        /// The full updated ticket
        ticket: Ticket,
    },

    /// The backend answered a delete request
    #[event]
    TicketDeleted {
        /// Fence sequence of the originating command
        seq: u64,
        /// Id that was targeted
        id: TicketId,
        /// Whether anything was actually removed
        deleted: bool,
    },

    /// A backend round-trip failed
    #[event]
    OperationFailed {
        /// Fence sequence of the originating command
        seq: u64,
        /// User-facing description
        message: String,
        /// Underlying error text, for logs only
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_and_events_are_classified() {
        assert!(TicketsAction::LoadTickets.is_command());
        assert!(!TicketsAction::LoadTickets.is_event());

        let event = TicketsAction::TicketsLoaded {
            seq: 1,
            tickets: Vec::new(),
        };
        assert!(event.is_event());
        assert!(!event.is_command());
        assert_eq!(event.name(), "TicketsLoaded");
    }
}
