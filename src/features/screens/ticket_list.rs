use std::sync::Arc;

use serde::Serialize;

use crate::core::error::Result;
use crate::features::backend::Session;
use crate::features::screens::runtime::{ListPhase, ScreenContext, ScreenHandle, ScreenMessage};
use crate::features::sync::{
    Change, FeedFilter, FeedSubscription, LiveFeed, PendingTicketSlot, ReconciliationStore,
};
use crate::features::tickets::clients::TicketSource;
use crate::features::tickets::models::{TicketRecord, TicketViewModel};
use crate::features::tickets::services::{bind, BoundTicket};

/// Rendered state of the ticket list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketListSnapshot {
    pub phase: ListPhase,
    pub rows: Vec<BoundTicket>,
}

impl Default for TicketListSnapshot {
    fn default() -> Self {
        Self {
            phase: ListPhase::Loading,
            rows: Vec::new(),
        }
    }
}

pub enum TicketListMessage {
    Refresh,
    FetchCompleted(Result<Vec<TicketRecord>>),
    Feed(Change<TicketRecord>),
    Teardown,
}

impl ScreenMessage for TicketListMessage {
    fn refresh() -> Self {
        TicketListMessage::Refresh
    }

    fn teardown() -> Self {
        TicketListMessage::Teardown
    }
}

pub type TicketListHandle = ScreenHandle<TicketListSnapshot, TicketListMessage>;

/// Collaborators of a ticket list screen
#[derive(Clone)]
pub struct TicketListDeps {
    pub session: Session,
    pub source: Arc<dyn TicketSource>,
    pub feed: Arc<dyn LiveFeed<TicketRecord>>,
    pub pending: PendingTicketSlot,
}

/// Customer ticket list, reconciled from a REST fetch and the live ticket feed.
pub struct TicketListScreen {
    session: Session,
    source: Arc<dyn TicketSource>,
    store: ReconciliationStore<TicketViewModel>,
    fetches_in_flight: usize,
    subscription: Option<FeedSubscription>,
}

impl TicketListScreen {
    /// Start the screen actor. Must be called inside a tokio runtime.
    pub fn open(deps: TicketListDeps) -> TicketListHandle {
        TicketListHandle::spawn(
            "ticket list",
            TicketListSnapshot::default(),
            move |context, mut inbox| async move {
                let TicketListDeps {
                    session,
                    source,
                    feed,
                    pending,
                } = deps;

                let mut screen = TicketListScreen {
                    session,
                    source,
                    store: ReconciliationStore::new(),
                    fetches_in_flight: 0,
                    subscription: None,
                };
                screen.start(&context, feed.as_ref(), &pending).await;

                while let Some(message) = inbox.recv().await {
                    if !screen.handle(&context, message) {
                        break;
                    }
                    context.publish(screen.snapshot());
                }
            },
        )
    }

    async fn start(
        &mut self,
        context: &ScreenContext<TicketListSnapshot, TicketListMessage>,
        feed: &dyn LiveFeed<TicketRecord>,
        pending: &PendingTicketSlot,
    ) {
        tracing::info!(
            "Ticket list screen opened for {}",
            self.session.customer_email()
        );

        if let Some(ticket) = pending.drain().await {
            tracing::debug!("Showing newly created ticket {}", ticket.ticket_id);
            self.store.upsert(ticket);
        }

        self.start_fetch(context);

        let changes = feed.subscribe(FeedFilter::customer(self.session.customer_email()));
        self.subscription = Some(FeedSubscription::forward(
            "tickets",
            changes,
            context.inbox(),
            TicketListMessage::Feed,
        ));

        context.publish(self.snapshot());
    }

    /// Returns false once the screen is dead.
    fn handle(
        &mut self,
        context: &ScreenContext<TicketListSnapshot, TicketListMessage>,
        message: TicketListMessage,
    ) -> bool {
        match message {
            TicketListMessage::Refresh => self.start_fetch(context),
            TicketListMessage::FetchCompleted(result) => self.on_fetch_completed(context, result),
            TicketListMessage::Feed(change) => self.on_change(change),
            TicketListMessage::Teardown => {
                self.teardown();
                return false;
            }
        }
        true
    }

    fn start_fetch(&mut self, context: &ScreenContext<TicketListSnapshot, TicketListMessage>) {
        self.fetches_in_flight += 1;

        let source = self.source.clone();
        let session = self.session.clone();
        context.spawn_reply(
            "ticket fetch",
            async move { source.fetch_tickets(&session).await },
            TicketListMessage::FetchCompleted,
        );
    }

    fn on_fetch_completed(
        &mut self,
        context: &ScreenContext<TicketListSnapshot, TicketListMessage>,
        result: Result<Vec<TicketRecord>>,
    ) {
        self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);

        match result {
            Ok(records) => {
                tracing::info!(
                    "Fetched {} tickets for {}",
                    records.len(),
                    self.session.customer_email()
                );
                self.store
                    .replace_all(records.into_iter().map(TicketViewModel::from).collect());
            }
            // Cached rows stay visible
            Err(e) => context.notice("ticket fetch", &e),
        }
    }

    fn on_change(&mut self, change: Change<TicketRecord>) {
        tracing::debug!(
            "Ticket feed: {:?} {}",
            change.change_type(),
            change.key()
        );

        match change {
            Change::Added(record) | Change::Modified(record) => {
                let merged = match self.store.get(&record.ticket_id) {
                    Some(existing) => {
                        let mut merged = existing.clone();
                        merged.apply(record);
                        merged
                    }
                    None => TicketViewModel::from(record),
                };
                self.store.upsert(merged);
            }
            Change::Removed(ticket_id) => self.store.remove(&ticket_id),
        }
    }

    fn teardown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unregister();
        }
        tracing::info!(
            "Ticket list screen closed for {}",
            self.session.customer_email()
        );
    }

    fn snapshot(&self) -> TicketListSnapshot {
        let phase = if self.fetches_in_flight > 0 {
            ListPhase::Loading
        } else {
            ListPhase::settled(self.store.len())
        };

        TicketListSnapshot {
            phase,
            rows: self.store.items().iter().map(bind).collect(),
        }
    }
}
