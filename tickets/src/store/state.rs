//! State for the tickets feature.

use std::collections::BTreeMap;

use crate::types::{Ticket, TicketFilter, TicketId, TicketPriority, TicketStatus};

/// Cached tickets plus UI-facing flags
///
/// The ticket list is a cache of what the backend last reported, not the
/// source of truth. `op_seq` fences async results: every command that
/// starts a backend round-trip bumps it, result events carry the value
/// they were issued under, and results from a superseded operation are
/// discarded instead of clobbering newer state.
#[derive(Debug, Clone, Default)]
pub struct TicketsState {
    /// Cached ticket list in backend order
    pub tickets: Vec<Ticket>,
    /// Id of the ticket shown in detail view, if any
    ///
    /// Not validated against the cache; it may briefly point at a ticket
    /// that was never listed (fetched directly) or that a later reload
    /// dropped.
    pub selected: Option<TicketId>,
    /// Active filter over the cached list
    pub filter: TicketFilter,
    /// A backend operation is in flight
    pub loading: bool,
    /// Last user-facing error, cleared when a new operation starts
    pub error: Option<String>,
    pub(crate) op_seq: u64,
}

impl TicketsState {
    /// Mark the start of a backend operation
    ///
    /// Bumps the fence, raises `loading`, clears any stale error, and
    /// returns the sequence number the eventual result event must carry.
    pub fn begin_operation(&mut self) -> u64 {
        self.op_seq += 1;
        self.loading = true;
        self.error = None;
        self.op_seq
    }

    /// Is `seq` the most recently issued operation?
    #[must_use]
    pub const fn is_current(&self, seq: u64) -> bool {
        seq == self.op_seq
    }

    /// Tickets admitted by the active filter, in cache order
    #[must_use]
    pub fn filtered_tickets(&self) -> Vec<&Ticket> {
        self.tickets.iter().filter(|t| self.filter.matches(t)).collect()
    }

    /// Count of all cached tickets, ignoring the filter
    #[must_use]
    pub fn total_tickets(&self) -> usize {
        self.tickets.len()
    }

    /// Count of cached tickets with status [`TicketStatus::Open`]
    #[must_use]
    pub fn open_tickets(&self) -> usize {
        self.tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Open)
            .count()
    }

    /// Count of cached tickets with priority [`TicketPriority::Critical`]
    #[must_use]
    pub fn critical_tickets(&self) -> usize {
        self.tickets
            .iter()
            .filter(|t| t.priority == TicketPriority::Critical)
            .count()
    }

    /// Ticket counts per status, zero-filled for statuses with no tickets
    #[must_use]
    pub fn stats_by_status(&self) -> BTreeMap<TicketStatus, usize> {
        let mut stats: BTreeMap<_, _> =
            TicketStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for ticket in &self.tickets {
            if let Some(count) = stats.get_mut(&ticket.status) {
                *count += 1;
            }
        }
        stats
    }

    /// Ticket counts per priority, zero-filled for priorities with no tickets
    #[must_use]
    pub fn stats_by_priority(&self) -> BTreeMap<TicketPriority, usize> {
        let mut stats: BTreeMap<_, _> =
            TicketPriority::ALL.into_iter().map(|p| (p, 0)).collect();
        for ticket in &self.tickets {
            if let Some(count) = stats.get_mut(&ticket.priority) {
                *count += 1;
            }
        }
        stats
    }

    /// Find a cached ticket by id
    #[must_use]
    pub fn ticket(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == *id)
    }

    /// The selected ticket, resolved against the cache
    #[must_use]
    pub fn selected_ticket(&self) -> Option<&Ticket> {
        self.selected.as_ref().and_then(|id| self.ticket(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TicketFilter;
    use chrono::{TimeZone, Utc};

    fn ticket(id: &str, status: TicketStatus, priority: TicketPriority) -> Ticket {
        Ticket {
            id: TicketId::from(id),
            title: format!("Ticket {id}"),
            description: String::new(),
            status,
            priority,
            assignee: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
            tags: Vec::new(),
        }
    }

    fn state_with_tickets() -> TicketsState {
        TicketsState {
            tickets: vec![
                ticket("1", TicketStatus::Open, TicketPriority::Critical),
                ticket("2", TicketStatus::Open, TicketPriority::Low),
                ticket("3", TicketStatus::Closed, TicketPriority::Critical),
            ],
            ..TicketsState::default()
        }
    }

    #[test]
    fn begin_operation_fences_and_resets_flags() {
        let mut state = TicketsState {
            error: Some("old error".to_string()),
            ..TicketsState::default()
        };

        let seq = state.begin_operation();

        assert_eq!(seq, 1);
        assert!(state.loading);
        assert!(state.error.is_none());
        assert!(state.is_current(seq));

        let newer = state.begin_operation();
        assert!(!state.is_current(seq));
        assert!(state.is_current(newer));
    }

    #[test]
    fn filtered_tickets_respects_filter() {
        let mut state = state_with_tickets();
        state.filter = TicketFilter {
            status: Some(TicketStatus::Open),
            priority: None,
            search: None,
        };

        let visible: Vec<_> = state
            .filtered_tickets()
            .iter()
            .map(|t| t.id.as_str().to_string())
            .collect();
        assert_eq!(visible, ["1", "2"]);
    }

    #[test]
    fn stats_are_zero_filled() {
        let state = state_with_tickets();

        let by_status = state.stats_by_status();
        assert_eq!(by_status[&TicketStatus::Open], 2);
        assert_eq!(by_status[&TicketStatus::InProgress], 0);
        assert_eq!(by_status[&TicketStatus::Resolved], 0);
        assert_eq!(by_status[&TicketStatus::Closed], 1);

        let by_priority = state.stats_by_priority();
        assert_eq!(by_priority[&TicketPriority::Critical], 2);
        assert_eq!(by_priority[&TicketPriority::Medium], 0);

        assert_eq!(state.total_tickets(), 3);
        assert_eq!(state.open_tickets(), 2);
        assert_eq!(state.critical_tickets(), 2);
    }

    #[test]
    fn stats_on_empty_state_are_all_zero() {
        let state = TicketsState::default();
        assert!(state.stats_by_status().values().all(|&n| n == 0));
        assert_eq!(state.stats_by_status().len(), 4);
        assert_eq!(state.total_tickets(), 0);
    }
}
