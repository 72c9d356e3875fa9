//! Backend client boundary and the in-memory development backend.
//!
//! The store only ever talks to [`TicketBackend`]; production would plug an
//! HTTP client in behind the same trait. [`InMemoryBackend`] simulates a
//! remote service faithfully enough to exercise every async code path:
//! per-operation latency with jitter, snapshot semantics (callers always
//! get owned copies, never references into the backing store), and
//! injectable failures.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::TimeZone;
use chrono::Utc;
use rand::Rng;
use ticketdesk_core::environment::{Clock, IdGenerator};
use tokio::sync::Mutex;

use crate::types::{CreateTicketDto, Ticket, TicketId, TicketPriority, TicketStatus, UpdateTicketDto};

/// Boxed future returned by backend operations
pub type BackendFuture<T> = Pin<Box<dyn Future<Output = Result<T, BackendError>> + Send>>;

/// Errors surfaced by backend operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// The referenced ticket does not exist
    #[error("ticket {id} not found")]
    NotFound {
        /// Id that failed to resolve
        id: TicketId,
    },

    /// The backend could not service the request
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Client boundary to the ticket backend
///
/// Object-safe so environments can hold `Arc<dyn TicketBackend>`. Reads of
/// absent tickets are not errors: `get` resolves to `Ok(None)` and `delete`
/// to `Ok(false)`, leaving the caller to decide what absence means.
pub trait TicketBackend: Send + Sync {
    /// Fetch all tickets
    fn list(&self) -> BackendFuture<Vec<Ticket>>;

    /// Fetch a single ticket, `None` if absent
    fn get(&self, id: TicketId) -> BackendFuture<Option<Ticket>>;

    /// Create a ticket; the backend assigns id and `created_at`
    fn create(&self, dto: CreateTicketDto) -> BackendFuture<Ticket>;

    /// Partially update a ticket, returning the full updated entity
    ///
    /// Resolves to [`BackendError::NotFound`] if the id is absent.
    fn update(&self, id: TicketId, dto: UpdateTicketDto) -> BackendFuture<Ticket>;

    /// Delete a ticket; `false` if it was already absent
    fn delete(&self, id: TicketId) -> BackendFuture<bool>;
}

/// Simulated network latency per operation
///
/// Reads are cheaper than the full list; writes sit in between. Each call
/// applies ±20% jitter so concurrent operations complete in realistic,
/// non-deterministic order.
#[derive(Debug, Clone, Copy)]
pub struct LatencyProfile {
    /// Latency for `list`
    pub list: Duration,
    /// Latency for `get`
    pub get: Duration,
    /// Latency for `create`
    pub create: Duration,
    /// Latency for `update`
    pub update: Duration,
    /// Latency for `delete`
    pub delete: Duration,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            list: Duration::from_millis(500),
            get: Duration::from_millis(300),
            create: Duration::from_millis(400),
            update: Duration::from_millis(400),
            delete: Duration::from_millis(300),
        }
    }
}

impl LatencyProfile {
    /// Zero latency everywhere; tests use this to keep runs fast
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            list: Duration::ZERO,
            get: Duration::ZERO,
            create: Duration::ZERO,
            update: Duration::ZERO,
            delete: Duration::ZERO,
        }
    }
}

async fn simulate_latency(base: Duration) {
    if base.is_zero() {
        return;
    }
    let jitter = rand::thread_rng().gen_range(0.8..=1.2);
    tokio::time::sleep(base.mul_f64(jitter)).await;
}

/// In-memory backend with simulated latency
///
/// Cloning shares the underlying ticket list, so a clone handed to the
/// store observes the same data as the original held by a test.
#[derive(Clone)]
pub struct InMemoryBackend {
    tickets: Arc<Mutex<Vec<Ticket>>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    latency: LatencyProfile,
    fail_next: Arc<AtomicBool>,
}

impl std::fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBackend")
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl InMemoryBackend {
    /// Create an empty backend
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            tickets: Arc::new(Mutex::new(Vec::new())),
            clock,
            ids,
            latency: LatencyProfile::default(),
            fail_next: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a backend pre-populated with the standard six-ticket fixture
    #[must_use]
    #[allow(clippy::expect_used, clippy::too_many_lines)] // hardcoded fixture timestamps always parse
    pub fn seeded(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        let at = |day: u32| {
            Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0)
                .single()
                .expect("fixture timestamp is valid")
        };
        let seed = vec![
            Ticket {
                id: TicketId::from("1"),
                title: "Fix login authentication bug".to_string(),
                description: "Users are unable to log in with their credentials. Need to investigate the authentication flow.".to_string(),
                status: TicketStatus::Open,
                priority: TicketPriority::High,
                assignee: Some("John Doe".to_string()),
                created_at: at(15),
                updated_at: Some(at(16)),
                tags: vec!["bug".to_string(), "authentication".to_string(), "critical".to_string()],
            },
            Ticket {
                id: TicketId::from("2"),
                title: "Implement user dashboard".to_string(),
                description: "Create a new dashboard page for users to view their account information and activity.".to_string(),
                status: TicketStatus::InProgress,
                priority: TicketPriority::Medium,
                assignee: Some("Jane Smith".to_string()),
                created_at: at(10),
                updated_at: Some(at(17)),
                tags: vec!["feature".to_string(), "dashboard".to_string(), "ui".to_string()],
            },
            Ticket {
                id: TicketId::from("3"),
                title: "Optimize database queries".to_string(),
                description: "Review and optimize slow database queries to improve application performance.".to_string(),
                status: TicketStatus::InProgress,
                priority: TicketPriority::High,
                assignee: Some("Bob Johnson".to_string()),
                created_at: at(12),
                updated_at: Some(at(18)),
                tags: vec!["performance".to_string(), "database".to_string()],
            },
            Ticket {
                id: TicketId::from("4"),
                title: "Update documentation".to_string(),
                description: "Update API documentation with the latest endpoints and examples.".to_string(),
                status: TicketStatus::Resolved,
                priority: TicketPriority::Low,
                assignee: Some("Alice Williams".to_string()),
                created_at: at(8),
                updated_at: Some(at(14)),
                tags: vec!["documentation".to_string()],
            },
            Ticket {
                id: TicketId::from("5"),
                title: "Security vulnerability in payment module".to_string(),
                description: "Critical security issue found in the payment processing module. Immediate attention required.".to_string(),
                status: TicketStatus::Open,
                priority: TicketPriority::Critical,
                assignee: Some("Charlie Brown".to_string()),
                created_at: at(19),
                updated_at: None,
                tags: vec!["security".to_string(), "critical".to_string(), "payment".to_string()],
            },
            Ticket {
                id: TicketId::from("6"),
                title: "Add dark mode support".to_string(),
                description: "Implement dark mode theme toggle for better user experience.".to_string(),
                status: TicketStatus::Closed,
                priority: TicketPriority::Low,
                assignee: Some("Diana Prince".to_string()),
                created_at: at(5),
                updated_at: Some(at(13)),
                tags: vec!["feature".to_string(), "ui".to_string(), "theme".to_string()],
            },
        ];
        Self {
            tickets: Arc::new(Mutex::new(seed)),
            clock,
            ids,
            latency: LatencyProfile::default(),
            fail_next: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the latency profile
    #[must_use]
    pub const fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// Make the next operation fail with [`BackendError::Unavailable`]
    ///
    /// One-shot: the flag clears when it fires.
    pub fn inject_failure(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn take_injected_failure(&self) -> Result<(), BackendError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            Err(BackendError::Unavailable("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl TicketBackend for InMemoryBackend {
    fn list(&self) -> BackendFuture<Vec<Ticket>> {
        let this = self.clone();
        Box::pin(async move {
            simulate_latency(this.latency.list).await;
            this.take_injected_failure()?;
            let tickets = this.tickets.lock().await;
            Ok(tickets.clone())
        })
    }

    fn get(&self, id: TicketId) -> BackendFuture<Option<Ticket>> {
        let this = self.clone();
        Box::pin(async move {
            simulate_latency(this.latency.get).await;
            this.take_injected_failure()?;
            let tickets = this.tickets.lock().await;
            Ok(tickets.iter().find(|t| t.id == id).cloned())
        })
    }

    fn create(&self, dto: CreateTicketDto) -> BackendFuture<Ticket> {
        let this = self.clone();
        Box::pin(async move {
            simulate_latency(this.latency.create).await;
            this.take_injected_failure()?;
            let now = this.clock.now();
            let ticket = Ticket {
                id: TicketId::new(this.ids.next_id()),
                title: dto.title,
                description: dto.description,
                status: dto.status,
                priority: dto.priority,
                assignee: dto.assignee,
                created_at: now,
                updated_at: Some(now),
                tags: dto.tags,
            };
            let mut tickets = this.tickets.lock().await;
            tickets.push(ticket.clone());
            Ok(ticket)
        })
    }

    fn update(&self, id: TicketId, dto: UpdateTicketDto) -> BackendFuture<Ticket> {
        let this = self.clone();
        Box::pin(async move {
            simulate_latency(this.latency.update).await;
            this.take_injected_failure()?;
            let now = this.clock.now();
            let mut tickets = this.tickets.lock().await;
            let Some(ticket) = tickets.iter_mut().find(|t| t.id == id) else {
                return Err(BackendError::NotFound { id });
            };
            ticket.apply_update(dto, now);
            Ok(ticket.clone())
        })
    }

    fn delete(&self, id: TicketId) -> BackendFuture<bool> {
        let this = self.clone();
        Box::pin(async move {
            simulate_latency(this.latency.delete).await;
            this.take_injected_failure()?;
            let mut tickets = this.tickets.lock().await;
            let before = tickets.len();
            tickets.retain(|t| t.id != id);
            Ok(tickets.len() < before)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketdesk_testing::{SequentialIdGenerator, SteppingClock, test_clock};

    fn backend() -> InMemoryBackend {
        InMemoryBackend::new(
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new()),
        )
        .with_latency(LatencyProfile::instant())
    }

    fn seeded_backend() -> InMemoryBackend {
        InMemoryBackend::seeded(
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new()),
        )
        .with_latency(LatencyProfile::instant())
    }

    fn dto(title: &str) -> CreateTicketDto {
        CreateTicketDto {
            title: title.to_string(),
            description: "details".to_string(),
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            assignee: None,
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn seeded_backend_lists_fixture_tickets() {
        let backend = seeded_backend();
        let tickets = backend.list().await.unwrap();
        assert_eq!(tickets.len(), 6);
        assert_eq!(tickets[0].id, TicketId::from("1"));
        assert_eq!(tickets[0].title, "Fix login authentication bug");
        assert_eq!(tickets[0].assignee.as_deref(), Some("John Doe"));
        assert_eq!(tickets[4].priority, TicketPriority::Critical);
        assert!(tickets[4].updated_at.is_none());
        assert_eq!(tickets[5].title, "Add dark mode support");
        assert_eq!(tickets[5].status, TicketStatus::Closed);
    }

    #[tokio::test]
    async fn create_assigns_id_and_created_at() {
        let backend = backend();
        let ticket = backend.create(dto("First")).await.unwrap();
        assert_eq!(ticket.id, TicketId::from("id-1"));
        assert_eq!(ticket.created_at, test_clock().now());
        assert_eq!(ticket.updated_at, Some(ticket.created_at));

        let fetched = backend.get(ticket.id.clone()).await.unwrap();
        assert_eq!(fetched, Some(ticket));
    }

    #[tokio::test]
    async fn get_absent_resolves_to_none() {
        let backend = backend();
        let fetched = backend.get(TicketId::from("ghost")).await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn update_merges_and_stamps_updated_at() {
        let backend = backend();
        let created = backend.create(dto("First")).await.unwrap();

        let updated = backend
            .update(
                created.id.clone(),
                UpdateTicketDto {
                    status: Some(TicketStatus::Resolved),
                    ..UpdateTicketDto::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.status, TicketStatus::Resolved);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn update_strictly_advances_updated_at() {
        let clock = Arc::new(SteppingClock::new(
            test_clock().now(),
            chrono::Duration::seconds(1),
        ));
        let backend = InMemoryBackend::new(clock, Arc::new(SequentialIdGenerator::new()))
            .with_latency(LatencyProfile::instant());

        let created = backend.create(dto("First")).await.unwrap();
        let updated = backend
            .update(
                created.id.clone(),
                UpdateTicketDto {
                    priority: Some(TicketPriority::High),
                    ..UpdateTicketDto::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.unwrap() > created.updated_at.unwrap());
        assert!(updated.updated_at.unwrap() > updated.created_at);
    }

    #[tokio::test]
    async fn update_absent_is_not_found() {
        let backend = backend();
        let err = backend
            .update(TicketId::from("ghost"), UpdateTicketDto::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
        assert_eq!(err.to_string(), "ticket ghost not found");
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let backend = backend();
        let created = backend.create(dto("First")).await.unwrap();

        assert!(backend.delete(created.id.clone()).await.unwrap());
        assert!(!backend.delete(created.id).await.unwrap());
        assert!(backend.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn injected_failure_is_one_shot() {
        let backend = seeded_backend();
        backend.inject_failure();

        let err = backend.list().await.unwrap_err();
        assert!(matches!(err, BackendError::Unavailable(_)));

        // Next call succeeds again
        assert_eq!(backend.list().await.unwrap().len(), 6);
    }
}
