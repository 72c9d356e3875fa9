//! The tickets feature: state, actions, environment, and reducer.
//!
//! Wired together into a running [`Store`](ticketdesk_runtime::Store) by
//! the [`app`](crate::app) module.

mod actions;
mod environment;
mod reducer;
mod state;

pub use actions::TicketsAction;
pub use environment::TicketsEnvironment;
pub use reducer::TicketsReducer;
pub use state::TicketsState;
