//! CLI demo driving the ticket tracker end to end.
//!
//! Loads the seeded fixture set, walks through the dashboard, filtering,
//! and the create/update/delete flow, and prints the notifications each
//! step produced.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ticketdesk::{
    CreateTicketDto, FilterUpdate, InMemoryBackend, TicketDesk, TicketId, TicketPriority,
    TicketStatus, UpdateTicketDto,
};
use ticketdesk_core::environment::{SystemClock, UuidIdGenerator};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Ticket Desk ===\n");

    let clock: Arc<SystemClock> = Arc::new(SystemClock);
    let ids = Arc::new(UuidIdGenerator);
    let backend = Arc::new(InMemoryBackend::seeded(clock.clone(), ids.clone()));
    let app = TicketDesk::new(backend, clock, ids);

    println!("Loading tickets...");
    app.load_tickets().await?.wait().await;

    app.state(|s| {
        println!("\nDashboard:");
        println!("  total:    {}", s.tickets.total_tickets());
        println!("  open:     {}", s.tickets.open_tickets());
        println!("  critical: {}", s.tickets.critical_tickets());
        for (status, count) in s.tickets.stats_by_status() {
            println!("  {status:<12} {count}");
        }
    })
    .await;

    // Filter down to open tickets, then search
    println!("\nOpen tickets:");
    app.set_filter(FilterUpdate::default().status(Some(TicketStatus::Open)))
        .await?
        .wait()
        .await;
    app.state(|s| {
        for ticket in s.tickets.filtered_tickets() {
            println!("  [{}] {} ({})", ticket.id, ticket.title, ticket.priority);
        }
    })
    .await;

    println!("\nSearching for \"database\":");
    app.set_filter(FilterUpdate::default().search(Some("database")))
        .await?
        .wait()
        .await;
    app.state(|s| {
        for ticket in s.tickets.filtered_tickets() {
            println!("  [{}] {}", ticket.id, ticket.title);
        }
    })
    .await;
    app.clear_filter().await?.wait().await;

    // Create, update, delete
    println!("\nCreating a ticket...");
    app.create_ticket(CreateTicketDto {
        title: "Investigate slow dashboard queries".to_string(),
        description: "The stats widgets take seconds to render on large projects.".to_string(),
        status: TicketStatus::Open,
        priority: TicketPriority::High,
        assignee: None,
        tags: vec!["performance".to_string()],
    })
    .await?
    .wait()
    .await;

    let created_id = app
        .state(|s| s.tickets.tickets.last().map(|t| t.id.clone()))
        .await;
    if let Some(id) = created_id {
        println!("\nResolving ticket {id}...");
        app.update_ticket(
            id.clone(),
            UpdateTicketDto {
                status: Some(TicketStatus::Resolved),
                ..UpdateTicketDto::default()
            },
        )
        .await?
        .wait()
        .await;

        println!("Deleting ticket {id}...");
        app.delete_ticket(id).await?.wait().await;
    }

    // Deleting something that is not there queues an error notification
    app.delete_ticket(TicketId::from("does-not-exist"))
        .await?
        .wait()
        .await;

    app.state(|s| {
        println!("\nNotifications:");
        for n in s.notifications.entries() {
            println!("  [{:?}] {}", n.kind, n.message);
        }
        println!("\nFinal ticket count: {}", s.tickets.total_tickets());
    })
    .await;

    app.shutdown(Duration::from_secs(30)).await?;
    Ok(())
}
