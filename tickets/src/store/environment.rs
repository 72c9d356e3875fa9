//! Environment for the tickets feature.

use std::sync::Arc;

use crate::backend::TicketBackend;

/// Dependencies of the tickets reducer
///
/// Only the backend: timestamps and ids are owned by the backend side of
/// the boundary, so the reducer itself never needs a clock.
#[derive(Clone)]
pub struct TicketsEnvironment {
    backend: Arc<dyn TicketBackend>,
}

impl TicketsEnvironment {
    /// Create an environment around the given backend
    #[must_use]
    pub fn new(backend: Arc<dyn TicketBackend>) -> Self {
        Self { backend }
    }

    /// The backend client
    #[must_use]
    pub fn backend(&self) -> Arc<dyn TicketBackend> {
        Arc::clone(&self.backend)
    }
}

impl std::fmt::Debug for TicketsEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketsEnvironment").finish_non_exhaustive()
    }
}
