use std::sync::Arc;

use serde::Serialize;

use crate::core::error::Result;
use crate::features::backend::Session;
use crate::features::payments::clients::PaymentSource;
use crate::features::payments::models::PaymentViewModel;
use crate::features::payments::services::{bind_payment, BoundPayment};
use crate::features::screens::runtime::{ListPhase, ScreenContext, ScreenHandle, ScreenMessage};
use crate::features::sync::{Change, FeedFilter, FeedSubscription, LiveFeed, ReconciliationStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentHistorySnapshot {
    pub phase: ListPhase,
    pub rows: Vec<BoundPayment>,
}

impl Default for PaymentHistorySnapshot {
    fn default() -> Self {
        Self {
            phase: ListPhase::Loading,
            rows: Vec::new(),
        }
    }
}

pub enum PaymentHistoryMessage {
    Refresh,
    FetchCompleted(Result<Vec<PaymentViewModel>>),
    Feed(Change<PaymentViewModel>),
    Teardown,
}

impl ScreenMessage for PaymentHistoryMessage {
    fn refresh() -> Self {
        PaymentHistoryMessage::Refresh
    }

    fn teardown() -> Self {
        PaymentHistoryMessage::Teardown
    }
}

pub type PaymentHistoryHandle = ScreenHandle<PaymentHistorySnapshot, PaymentHistoryMessage>;

#[derive(Clone)]
pub struct PaymentHistoryDeps {
    pub session: Session,
    pub source: Arc<dyn PaymentSource>,
    pub feed: Arc<dyn LiveFeed<PaymentViewModel>>,
}

/// Customer payment list, one row per ticket. Read-only: never completes
/// payments.
pub struct PaymentHistoryScreen {
    session: Session,
    source: Arc<dyn PaymentSource>,
    store: ReconciliationStore<PaymentViewModel>,
    fetches_in_flight: usize,
    subscription: Option<FeedSubscription>,
}

impl PaymentHistoryScreen {
    pub fn open(deps: PaymentHistoryDeps) -> PaymentHistoryHandle {
        PaymentHistoryHandle::spawn(
            "payment history",
            PaymentHistorySnapshot::default(),
            move |context, mut inbox| async move {
                let PaymentHistoryDeps {
                    session,
                    source,
                    feed,
                } = deps;

                let mut screen = PaymentHistoryScreen {
                    session,
                    source,
                    store: ReconciliationStore::new(),
                    fetches_in_flight: 0,
                    subscription: None,
                };
                screen.start_fetch(&context);

                let changes = feed.subscribe(FeedFilter::customer(screen.session.customer_email()));
                screen.subscription = Some(FeedSubscription::forward(
                    "payment history",
                    changes,
                    context.inbox(),
                    PaymentHistoryMessage::Feed,
                ));
                context.publish(screen.snapshot());

                while let Some(message) = inbox.recv().await {
                    match message {
                        PaymentHistoryMessage::Refresh => screen.start_fetch(&context),
                        PaymentHistoryMessage::FetchCompleted(result) => {
                            screen.on_fetch_completed(&context, result)
                        }
                        PaymentHistoryMessage::Feed(change) => screen.on_change(change),
                        PaymentHistoryMessage::Teardown => {
                            if let Some(mut subscription) = screen.subscription.take() {
                                subscription.unregister();
                            }
                            tracing::info!(
                                "Payment history closed for {}",
                                screen.session.customer_email()
                            );
                            break;
                        }
                    }
                    context.publish(screen.snapshot());
                }
            },
        )
    }

    fn start_fetch(
        &mut self,
        context: &ScreenContext<PaymentHistorySnapshot, PaymentHistoryMessage>,
    ) {
        self.fetches_in_flight += 1;

        let source = self.source.clone();
        let session = self.session.clone();
        context.spawn_reply(
            "payment history fetch",
            async move { source.fetch_payments(&session).await },
            PaymentHistoryMessage::FetchCompleted,
        );
    }

    fn on_fetch_completed(
        &mut self,
        context: &ScreenContext<PaymentHistorySnapshot, PaymentHistoryMessage>,
        result: Result<Vec<PaymentViewModel>>,
    ) {
        self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);

        match result {
            Ok(payments) => {
                tracing::info!(
                    "Fetched {} payments for {}",
                    payments.len(),
                    self.session.customer_email()
                );
                self.store.replace_all(payments);
            }
            Err(e) => context.notice("payment history fetch", &e),
        }
    }

    fn on_change(&mut self, change: Change<PaymentViewModel>) {
        match change {
            Change::Added(payment) | Change::Modified(payment) => self.store.upsert(payment),
            Change::Removed(ticket_id) => self.store.remove(&ticket_id),
        }
    }

    fn snapshot(&self) -> PaymentHistorySnapshot {
        let phase = if self.fetches_in_flight > 0 {
            ListPhase::Loading
        } else {
            ListPhase::settled(self.store.len())
        };

        PaymentHistorySnapshot {
            phase,
            rows: self.store.items().iter().map(bind_payment).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::screens::runtime::ScreenEvent;
    use crate::features::sync::{ChangeType, ChannelFeed};
    use crate::shared::constants::PAID_LABEL;
    use crate::shared::test_helpers::{fake_payment, test_session, StubPaymentSource};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(2);

    async fn wait_until<P>(screen: &mut PaymentHistoryHandle, predicate: P) -> PaymentHistorySnapshot
    where
        P: FnMut(&PaymentHistorySnapshot) -> bool,
    {
        tokio::time::timeout(WAIT, screen.wait_for(predicate))
            .await
            .expect("timed out waiting for payment history")
            .expect("payment history stopped")
    }

    #[tokio::test]
    async fn test_history_merges_feed_without_completing() {
        let source = Arc::new(StubPaymentSource::default());
        source.history.lock().unwrap().extend([
            fake_payment("TCK-1", "online"),
            fake_payment("TCK-2", "cash"),
        ]);
        let feed: Arc<ChannelFeed<PaymentViewModel>> = Arc::new(ChannelFeed::new(16));

        let mut screen = PaymentHistoryScreen::open(PaymentHistoryDeps {
            session: test_session(),
            source: source.clone(),
            feed: feed.clone(),
        });

        let loaded = wait_until(&mut screen, |s| s.phase == ListPhase::Ready).await;
        assert_eq!(loaded.rows.len(), 2);

        for _ in 0..100 {
            if feed.subscriber_count() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let mut settled = fake_payment("TCK-2", "cash");
        settled.status = "completed".to_string();
        feed.publish(ChangeType::Modified, settled);

        let updated = wait_until(&mut screen, |s| {
            s.rows
                .iter()
                .any(|r| r.ticket_id == "TCK-2" && r.action_label == PAID_LABEL)
        })
        .await;
        let ids: Vec<&str> = updated.rows.iter().map(|r| r.ticket_id.as_str()).collect();
        assert_eq!(ids, vec!["TCK-1", "TCK-2"]);
        assert!(source.completions().is_empty());

        screen.teardown().await;
    }

    #[tokio::test]
    async fn test_history_failure_shows_empty_state() {
        let source = Arc::new(StubPaymentSource::default());
        source.fail_fetch.store(true, Ordering::SeqCst);
        let feed: Arc<ChannelFeed<PaymentViewModel>> = Arc::new(ChannelFeed::new(16));

        let mut screen = PaymentHistoryScreen::open(PaymentHistoryDeps {
            session: test_session(),
            source,
            feed,
        });

        let event = tokio::time::timeout(WAIT, screen.next_event())
            .await
            .unwrap();
        assert!(matches!(event, Some(ScreenEvent::Notice(_))));

        let snapshot = wait_until(&mut screen, |s| s.phase != ListPhase::Loading).await;
        assert_eq!(snapshot.phase, ListPhase::Empty);

        screen.teardown().await;
    }
}
