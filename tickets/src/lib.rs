//! # ticketdesk
//!
//! Ticket tracking built on the reducer architecture: a cached view of a
//! remote ticket backend, filtering and dashboard statistics derived from
//! it, and transient notifications that expire on their own.
//!
//! ## Layout
//!
//! - [`types`]: the entity model (tickets, DTOs, filters)
//! - [`backend`]: the client boundary plus an in-memory backend that
//!   simulates remote latency
//! - [`store`]: state, actions, and reducer for the tickets feature
//! - [`notifications`]: the auto-expiring notification queue
//! - [`app`]: composition of both features behind one [`Store`] and the
//!   [`TicketDesk`] facade
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ticketdesk::{InMemoryBackend, TicketDesk};
//! use ticketdesk_core::environment::{SystemClock, UuidIdGenerator};
//!
//! let clock = Arc::new(SystemClock);
//! let ids = Arc::new(UuidIdGenerator);
//! let backend = Arc::new(InMemoryBackend::seeded(clock.clone(), ids.clone()));
//! let app = TicketDesk::new(backend, clock, ids);
//!
//! let mut handle = app.load_tickets().await?;
//! handle.wait().await;
//! let total = app.state(|s| s.tickets.total_tickets()).await;
//! ```
//!
//! [`Store`]: ticketdesk_runtime::Store

pub mod app;
pub mod backend;
pub mod notifications;
pub mod store;
pub mod types;

pub use app::{AppAction, AppEnvironment, AppReducer, AppState, TicketDesk};
pub use backend::{BackendError, InMemoryBackend, LatencyProfile, TicketBackend};
pub use notifications::{
    NOTIFICATION_TTL, Notification, NotificationAction, NotificationId, NotificationKind,
    NotificationState,
};
pub use store::{TicketsAction, TicketsEnvironment, TicketsReducer, TicketsState};
pub use types::{
    CreateTicketDto, FilterUpdate, Ticket, TicketFilter, TicketId, TicketPriority,
    TicketStatus, UpdateTicketDto,
};
