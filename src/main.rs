use std::sync::Arc;

use servicehub_sync::core::config::Config;
use servicehub_sync::features::backend::{ServiceHubClient, Session};
use servicehub_sync::features::payments::{PaymentSnapshots, PaymentSource, PaymentViewModel};
use servicehub_sync::features::screens::{
    PaymentDeps, PaymentScreen, PaymentSnapshot, ScreenEvent, ScreenHandle, ScreenMessage,
    ScreenUpdate, TicketListDeps, TicketListScreen, TicketListSnapshot,
};
use servicehub_sync::features::sync::{PendingTicketSlot, PollingFeed};
use servicehub_sync::features::tickets::{
    bind, TicketRecord, TicketService, TicketSnapshots, TicketSource,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: servicehub-sync [watch | list | pay <TICKET_ID>]";

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(2)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("Configuration loaded successfully");

    let client = Arc::new(ServiceHubClient::new(&config.api)?);
    let session = Session::from(&config.session);
    tracing::info!(
        "ServiceHub client initialized: base_url={}, customer={}",
        client.base_url(),
        session.customer_email()
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["watch"] => watch_tickets(client, session, &config).await,
        ["list"] => list_tickets(client, session).await,
        ["pay", ticket_id] => watch_payment(client, session, &config, ticket_id).await,
        _ => Err(anyhow::anyhow!(USAGE)),
    }
}

/// Print the customer's tickets once and exit.
async fn list_tickets(client: Arc<ServiceHubClient>, session: Session) -> anyhow::Result<()> {
    let source: Arc<dyn TicketSource> = client;
    let service = TicketService::new(source, PendingTicketSlot::new());

    let tickets = service.list(&session).await?;
    tracing::info!("{} tickets", tickets.len());
    for ticket in &tickets {
        let row = bind(ticket);
        tracing::info!(
            "{} | {} | {} | {} | pay={}",
            row.ticket_id,
            row.label,
            row.status_text,
            row.color_token.hex(),
            row.pay_action_visible
        );
    }

    Ok(())
}

async fn watch_tickets(
    client: Arc<ServiceHubClient>,
    session: Session,
    config: &Config,
) -> anyhow::Result<()> {
    let snapshots = TicketSnapshots::new(Arc::clone(&client), session.clone());
    let feed: PollingFeed<TicketRecord, _> =
        PollingFeed::new(Arc::new(snapshots), config.feed.clone());

    let screen = TicketListScreen::open(TicketListDeps {
        session,
        source: client,
        feed: Arc::new(feed),
        pending: PendingTicketSlot::new(),
    });

    run_until_shutdown(screen, log_ticket_list).await
}

async fn watch_payment(
    client: Arc<ServiceHubClient>,
    session: Session,
    config: &Config,
    ticket_id: &str,
) -> anyhow::Result<()> {
    let source: Arc<dyn PaymentSource> = client;
    let snapshots = PaymentSnapshots::new(Arc::clone(&source), session.clone());
    let feed: PollingFeed<PaymentViewModel, _> =
        PollingFeed::new(Arc::new(snapshots), config.feed.clone());

    let screen = PaymentScreen::open(PaymentDeps {
        session,
        ticket_id: ticket_id.to_string(),
        source,
        feed: Arc::new(feed),
    });

    run_until_shutdown(screen, log_payment).await
}

/// Log every update of `screen` until Ctrl-C, then tear it down.
async fn run_until_shutdown<S, M>(
    mut screen: ScreenHandle<S, M>,
    render: fn(&S),
) -> anyhow::Result<()>
where
    S: Clone + Send + Sync + 'static,
    M: ScreenMessage,
{
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                tracing::info!("Shutdown signal received");
                break;
            }
            update = screen.next_update() => match update {
                Some(ScreenUpdate::Snapshot(snapshot)) => render(&snapshot),
                Some(ScreenUpdate::Event(ScreenEvent::Notice(message))) => {
                    tracing::warn!("Notice: {}", message)
                }
                Some(ScreenUpdate::Event(ScreenEvent::Navigate(outcome))) => {
                    tracing::info!("Navigate: {}", serde_json::to_string(&outcome)?)
                }
                None => break,
            }
        }
    }

    screen.teardown().await;
    Ok(())
}

fn log_ticket_list(snapshot: &TicketListSnapshot) {
    tracing::info!(
        "Ticket list: phase={:?}, rows={}",
        snapshot.phase,
        snapshot.rows.len()
    );
    for row in &snapshot.rows {
        tracing::info!(
            "  {} | {} | {} | {} | pay={}",
            row.ticket_id,
            row.label,
            row.status_text,
            row.color_token.hex(),
            row.pay_action_visible
        );
    }
}

fn log_payment(snapshot: &PaymentSnapshot) {
    match &snapshot.payment {
        Some(payment) => tracing::info!(
            "Payment {}: {} {} [{}{}]",
            payment.ticket_id,
            payment.service_name,
            payment.amount_text,
            payment.action_label,
            if payment.action_enabled { "" } else { ", disabled" }
        ),
        None => tracing::info!("Payment: phase={:?}", snapshot.phase),
    }
}
