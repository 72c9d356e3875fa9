//! Property tests for filter semantics and dashboard statistics.

#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use ticketdesk::{
    Ticket, TicketFilter, TicketId, TicketPriority, TicketStatus, TicketsState,
};

fn status_strategy() -> impl Strategy<Value = TicketStatus> {
    prop::sample::select(TicketStatus::ALL.to_vec())
}

fn priority_strategy() -> impl Strategy<Value = TicketPriority> {
    prop::sample::select(TicketPriority::ALL.to_vec())
}

prop_compose! {
    fn ticket_strategy()(
        id in "[a-z0-9]{1,8}",
        title in "[a-zA-Z ]{0,20}",
        description in "[a-zA-Z ]{0,30}",
        status in status_strategy(),
        priority in priority_strategy(),
        tags in prop::collection::vec("[a-z]{1,6}", 0..3),
    ) -> Ticket {
        Ticket {
            id: TicketId::new(id),
            title,
            description,
            status,
            priority,
            assignee: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
            tags,
        }
    }
}

fn tickets_strategy() -> impl Strategy<Value = Vec<Ticket>> {
    prop::collection::vec(ticket_strategy(), 0..12)
}

proptest! {
    #[test]
    fn empty_filter_is_the_identity(tickets in tickets_strategy()) {
        let mut state = TicketsState::default();
        state.tickets = tickets.clone();
        prop_assert_eq!(state.filtered_tickets().len(), tickets.len());
    }

    #[test]
    fn filtered_tickets_is_a_subset_that_all_match(
        tickets in tickets_strategy(),
        status in prop::option::of(status_strategy()),
        priority in prop::option::of(priority_strategy()),
    ) {
        let filter = TicketFilter { status, priority, search: None };
        let mut state = TicketsState::default();
        state.tickets = tickets;
        state.filter = filter.clone();

        let visible = state.filtered_tickets();
        prop_assert!(visible.len() <= state.total_tickets());
        for ticket in visible {
            prop_assert!(filter.matches(ticket));
        }
    }

    #[test]
    fn search_ignores_status_and_priority(
        tickets in tickets_strategy(),
        status in prop::option::of(status_strategy()),
        priority in prop::option::of(priority_strategy()),
        needle in "[a-z]{1,4}",
    ) {
        let with_predicates = TicketFilter {
            status,
            priority,
            search: Some(needle.clone()),
        };
        let search_only = TicketFilter {
            status: None,
            priority: None,
            search: Some(needle),
        };

        for ticket in &tickets {
            prop_assert_eq!(
                with_predicates.matches(ticket),
                search_only.matches(ticket),
            );
        }
    }

    #[test]
    fn blank_search_behaves_like_no_search(
        tickets in tickets_strategy(),
        status in prop::option::of(status_strategy()),
        blanks in " {0,4}",
    ) {
        let with_blank = TicketFilter {
            status,
            priority: None,
            search: Some(blanks),
        };
        let without = TicketFilter {
            status,
            priority: None,
            search: None,
        };

        for ticket in &tickets {
            prop_assert_eq!(with_blank.matches(ticket), without.matches(ticket));
        }
    }

    #[test]
    fn status_stats_sum_to_total(tickets in tickets_strategy()) {
        let mut state = TicketsState::default();
        state.tickets = tickets;

        let by_status = state.stats_by_status();
        prop_assert_eq!(by_status.len(), 4);
        prop_assert_eq!(by_status.values().sum::<usize>(), state.total_tickets());
        prop_assert_eq!(by_status[&TicketStatus::Open], state.open_tickets());

        let by_priority = state.stats_by_priority();
        prop_assert_eq!(by_priority.values().sum::<usize>(), state.total_tickets());
        prop_assert_eq!(
            by_priority[&TicketPriority::Critical],
            state.critical_tickets()
        );
    }

    #[test]
    fn search_is_case_insensitive(tickets in tickets_strategy(), needle in "[a-z]{1,4}") {
        let lower = TicketFilter {
            status: None,
            priority: None,
            search: Some(needle.clone()),
        };
        let upper = TicketFilter {
            status: None,
            priority: None,
            search: Some(needle.to_uppercase()),
        };

        for ticket in &tickets {
            prop_assert_eq!(lower.matches(ticket), upper.matches(ticket));
        }
    }
}
