//! Domain types for the ticket tracker.
//!
//! A ticket is the core tracked work item. Tickets are created and mutated
//! only by the backend; the store caches copies and keeps them in sync
//! through explicit round-trips.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a ticket
///
/// Opaque string assigned by the backend at creation; stable for the
/// entity's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Creates a `TicketId` from an existing id string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TicketId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Workflow status of a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Newly filed, nobody working on it yet
    Open,
    /// Actively being worked on
    InProgress,
    /// Fixed, awaiting confirmation
    Resolved,
    /// Done, no further action
    Closed,
}

impl TicketStatus {
    /// All statuses in workflow order; used for zero-filled statistics
    pub const ALL: [Self; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    /// The wire representation of this status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    /// Can wait
    Low,
    /// Normal queue
    Medium,
    /// Should be picked up soon
    High,
    /// Drop everything
    Critical,
}

impl TicketPriority {
    /// All priorities in ascending severity; used for zero-filled statistics
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// The wire representation of this priority
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked work item
///
/// Invariants: `id` and `created_at` never change after creation;
/// `updated_at`, when present, is ≥ `created_at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Unique identifier, assigned by the backend
    pub id: TicketId,
    /// Short summary (non-empty)
    pub title: String,
    /// Free-form details
    pub description: String,
    /// Workflow status
    pub status: TicketStatus,
    /// Priority
    pub priority: TicketPriority,
    /// Person currently responsible, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Set at creation and on every mutation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Ordered labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Ticket {
    /// Merge the present fields of an update onto this ticket
    ///
    /// Absent fields are left unchanged; `updated_at` is stamped with `now`.
    pub fn apply_update(&mut self, dto: UpdateTicketDto, now: DateTime<Utc>) {
        if let Some(title) = dto.title {
            self.title = title;
        }
        if let Some(description) = dto.description {
            self.description = description;
        }
        if let Some(status) = dto.status {
            self.status = status;
        }
        if let Some(priority) = dto.priority {
            self.priority = priority;
        }
        if let Some(assignee) = dto.assignee {
            self.assignee = Some(assignee);
        }
        if let Some(tags) = dto.tags {
            self.tags = tags;
        }
        self.updated_at = Some(now);
    }
}

/// Payload for creating a ticket
///
/// No id and no timestamps: the backend assigns those.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketDto {
    /// Short summary (non-empty)
    pub title: String,
    /// Free-form details
    pub description: String,
    /// Initial workflow status
    pub status: TicketStatus,
    /// Initial priority
    pub priority: TicketPriority,
    /// Person responsible, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Ordered labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Sparse payload for partially updating a ticket
///
/// Every field is independently present-or-absent; absent fields leave the
/// target unchanged. There is no way to clear `assignee` or `tags` through
/// an update, only to replace them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketDto {
    /// Replacement title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    /// Replacement priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
    /// Replacement assignee
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Replacement tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Query predicate for the visible subset of tickets
///
/// `None` on status/priority means "match all". A non-blank `search`
/// replaces the status/priority predicates entirely: it substring-matches
/// (case-insensitively) against title, description, and tags, and the
/// other two fields are ignored while it is present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TicketFilter {
    /// Restrict to a single status (`None` = match all)
    pub status: Option<TicketStatus>,
    /// Restrict to a single priority (`None` = match all)
    pub priority: Option<TicketPriority>,
    /// Free-text substring query
    pub search: Option<String>,
}

impl TicketFilter {
    /// True if this filter matches every ticket
    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.search.as_deref().is_none_or(|s| s.trim().is_empty())
    }

    /// Does this filter admit the given ticket?
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(search) = self.search.as_deref() {
            if !search.trim().is_empty() {
                let needle = search.to_lowercase();
                return ticket.title.to_lowercase().contains(&needle)
                    || ticket.description.to_lowercase().contains(&needle)
                    || ticket.tags.iter().any(|tag| tag.to_lowercase().contains(&needle));
            }
        }

        if self.status.is_some_and(|status| status != ticket.status) {
            return false;
        }
        if self.priority.is_some_and(|priority| priority != ticket.priority) {
            return false;
        }
        true
    }

    /// Merge a sparse update into this filter
    ///
    /// Fields the update does not mention are left unchanged.
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(search) = update.search {
            self.search = search;
        }
    }
}

/// Sparse patch for [`TicketFilter`]
///
/// The outer `Option` distinguishes "leave this field unchanged" (`None`)
/// from "replace this field" (`Some`); the inner value may itself be `None`
/// to reset a field to match-all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    /// Replacement status filter, if mentioned
    pub status: Option<Option<TicketStatus>>,
    /// Replacement priority filter, if mentioned
    pub priority: Option<Option<TicketPriority>>,
    /// Replacement search query, if mentioned
    pub search: Option<Option<String>>,
}

impl FilterUpdate {
    /// Patch the status filter
    #[must_use]
    pub const fn status(mut self, status: Option<TicketStatus>) -> Self {
        self.status = Some(status);
        self
    }

    /// Patch the priority filter
    #[must_use]
    pub const fn priority(mut self, priority: Option<TicketPriority>) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Patch the search query
    #[must_use]
    pub fn search(mut self, search: Option<impl Into<String>>) -> Self {
        self.search = Some(search.map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ticket(id: &str, status: TicketStatus, priority: TicketPriority) -> Ticket {
        Ticket {
            id: TicketId::from(id),
            title: format!("Ticket {id}"),
            description: "A ticket".to_string(),
            status,
            priority,
            assignee: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
            updated_at: None,
            tags: vec!["bug".to_string()],
        }
    }

    #[test]
    fn status_round_trips_through_wire_names() {
        for status in TicketStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
            let back: TicketStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
        assert_eq!(TicketStatus::InProgress.as_str(), "in_progress");
    }

    #[test]
    fn ticket_serializes_with_wire_field_names() {
        let t = ticket("t-1", TicketStatus::Open, TicketPriority::High);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["id"], "t-1");
        assert_eq!(json["status"], "open");
        assert_eq!(json["priority"], "high");
        assert!(json.get("createdAt").is_some());
        // Absent optional fields are omitted entirely
        assert!(json.get("assignee").is_none());
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn apply_update_merges_only_present_fields() {
        let mut t = ticket("t-1", TicketStatus::Open, TicketPriority::Low);
        let created = t.created_at;
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();

        t.apply_update(
            UpdateTicketDto {
                status: Some(TicketStatus::Resolved),
                ..UpdateTicketDto::default()
            },
            now,
        );

        assert_eq!(t.status, TicketStatus::Resolved);
        assert_eq!(t.priority, TicketPriority::Low);
        assert_eq!(t.title, "Ticket t-1");
        assert_eq!(t.created_at, created);
        assert_eq!(t.updated_at, Some(now));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TicketFilter::default();
        assert!(filter.is_match_all());
        assert!(filter.matches(&ticket("a", TicketStatus::Closed, TicketPriority::Low)));
    }

    #[test]
    fn status_and_priority_filters_combine() {
        let filter = TicketFilter {
            status: Some(TicketStatus::Open),
            priority: Some(TicketPriority::High),
            search: None,
        };
        assert!(filter.matches(&ticket("a", TicketStatus::Open, TicketPriority::High)));
        assert!(!filter.matches(&ticket("b", TicketStatus::Open, TicketPriority::Low)));
        assert!(!filter.matches(&ticket("c", TicketStatus::Closed, TicketPriority::High)));
    }

    #[test]
    fn non_blank_search_replaces_status_and_priority() {
        // The search predicate supersedes the other two while present
        let filter = TicketFilter {
            status: Some(TicketStatus::Closed),
            priority: Some(TicketPriority::Critical),
            search: Some("ticket a".to_string()),
        };
        assert!(filter.matches(&ticket("a", TicketStatus::Open, TicketPriority::Low)));
    }

    #[test]
    fn blank_search_is_ignored() {
        let filter = TicketFilter {
            status: Some(TicketStatus::Open),
            priority: None,
            search: Some("   ".to_string()),
        };
        assert!(filter.matches(&ticket("a", TicketStatus::Open, TicketPriority::Low)));
        assert!(!filter.matches(&ticket("b", TicketStatus::Closed, TicketPriority::Low)));
    }

    #[test]
    fn search_matches_tags_case_insensitively() {
        let filter = TicketFilter {
            status: None,
            priority: None,
            search: Some("BUG".to_string()),
        };
        assert!(filter.matches(&ticket("a", TicketStatus::Open, TicketPriority::Low)));
    }

    #[test]
    fn filter_update_touches_only_mentioned_fields() {
        let mut filter = TicketFilter {
            status: Some(TicketStatus::Open),
            priority: Some(TicketPriority::High),
            search: Some("auth".to_string()),
        };

        filter.apply(FilterUpdate::default().status(None));

        assert_eq!(filter.status, None);
        assert_eq!(filter.priority, Some(TicketPriority::High));
        assert_eq!(filter.search.as_deref(), Some("auth"));
    }
}
