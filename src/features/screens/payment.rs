use std::sync::Arc;

use serde::Serialize;

use crate::core::error::Result;
use crate::features::backend::Session;
use crate::features::payments::clients::PaymentSource;
use crate::features::payments::models::{PaymentOutcome, PaymentViewModel};
use crate::features::payments::services::{bind_payment, AutoCompleteLatch, BoundPayment};
use crate::features::screens::runtime::{
    ListPhase, ScreenContext, ScreenEvent, ScreenHandle, ScreenMessage,
};
use crate::features::sync::{Change, FeedFilter, FeedSubscription, LiveFeed};
use crate::shared::constants::PAYMENT_STATUS_COMPLETED;

/// Rendered state of the payment screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSnapshot {
    /// `Empty` until the backend has created a payment for the ticket
    pub phase: ListPhase,
    pub payment: Option<BoundPayment>,
    pub completing: bool,
}

impl Default for PaymentSnapshot {
    fn default() -> Self {
        Self {
            phase: ListPhase::Loading,
            payment: None,
            completing: false,
        }
    }
}

pub enum PaymentMessage {
    Refresh,
    FetchCompleted(Result<Option<PaymentViewModel>>),
    Feed(Change<PaymentViewModel>),
    CompletionFinished(PaymentOutcome),
    Teardown,
}

impl ScreenMessage for PaymentMessage {
    fn refresh() -> Self {
        PaymentMessage::Refresh
    }

    fn teardown() -> Self {
        PaymentMessage::Teardown
    }
}

pub type PaymentHandle = ScreenHandle<PaymentSnapshot, PaymentMessage>;

#[derive(Clone)]
pub struct PaymentDeps {
    pub session: Session,
    pub ticket_id: String,
    pub source: Arc<dyn PaymentSource>,
    pub feed: Arc<dyn LiveFeed<PaymentViewModel>>,
}

/// Payment of one ticket. Completes pending online payments once per screen.
pub struct PaymentScreen {
    session: Session,
    ticket_id: String,
    source: Arc<dyn PaymentSource>,
    payment: Option<PaymentViewModel>,
    latch: AutoCompleteLatch,
    fetches_in_flight: usize,
    completing: bool,
    subscription: Option<FeedSubscription>,
}

impl PaymentScreen {
    pub fn open(deps: PaymentDeps) -> PaymentHandle {
        PaymentHandle::spawn(
            "payment",
            PaymentSnapshot::default(),
            move |context, mut inbox| async move {
                let PaymentDeps {
                    session,
                    ticket_id,
                    source,
                    feed,
                } = deps;

                let mut screen = PaymentScreen {
                    session,
                    ticket_id,
                    source,
                    payment: None,
                    latch: AutoCompleteLatch::new(),
                    fetches_in_flight: 0,
                    completing: false,
                    subscription: None,
                };
                screen.start(&context, feed.as_ref());

                while let Some(message) = inbox.recv().await {
                    if !screen.handle(&context, message) {
                        break;
                    }
                    context.publish(screen.snapshot());
                }
            },
        )
    }

    fn start(
        &mut self,
        context: &ScreenContext<PaymentSnapshot, PaymentMessage>,
        feed: &dyn LiveFeed<PaymentViewModel>,
    ) {
        tracing::info!(
            "Payment screen opened for ticket {} ({})",
            self.ticket_id,
            self.session.customer_email()
        );

        self.start_fetch(context);

        let filter =
            FeedFilter::customer(self.session.customer_email()).for_ticket(self.ticket_id.clone());
        self.subscription = Some(FeedSubscription::forward(
            "payments",
            feed.subscribe(filter),
            context.inbox(),
            PaymentMessage::Feed,
        ));

        context.publish(self.snapshot());
    }

    fn handle(
        &mut self,
        context: &ScreenContext<PaymentSnapshot, PaymentMessage>,
        message: PaymentMessage,
    ) -> bool {
        match message {
            PaymentMessage::Refresh => self.start_fetch(context),
            PaymentMessage::FetchCompleted(result) => {
                self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
                match result {
                    Ok(Some(payment)) => self.observe(context, payment),
                    Ok(None) => {
                        tracing::debug!("No payment for ticket {}", self.ticket_id);
                        self.payment = None;
                    }
                    Err(e) => context.notice("payment fetch", &e),
                }
            }
            PaymentMessage::Feed(change) => match change {
                Change::Added(payment) | Change::Modified(payment) => {
                    tracing::debug!("Payment feed update for ticket {}", payment.ticket_id);
                    self.observe(context, payment);
                }
                Change::Removed(_) => self.payment = None,
            },
            PaymentMessage::CompletionFinished(outcome) => {
                self.completing = false;
                if let PaymentOutcome::Success { payment_id, .. } = &outcome {
                    self.mark_completed(*payment_id);
                }
                context.emit(ScreenEvent::Navigate(outcome));
            }
            PaymentMessage::Teardown => {
                if let Some(mut subscription) = self.subscription.take() {
                    subscription.unregister();
                }
                tracing::info!("Payment screen closed for ticket {}", self.ticket_id);
                return false;
            }
        }
        true
    }

    fn start_fetch(&mut self, context: &ScreenContext<PaymentSnapshot, PaymentMessage>) {
        self.fetches_in_flight += 1;

        let source = self.source.clone();
        let session = self.session.clone();
        let ticket_id = self.ticket_id.clone();
        context.spawn_reply(
            "payment fetch",
            async move { source.fetch_payment(&session, &ticket_id).await },
            PaymentMessage::FetchCompleted,
        );
    }

    /// Every observed payment is evaluated against the latch, whichever
    /// source it came from.
    fn observe(
        &mut self,
        context: &ScreenContext<PaymentSnapshot, PaymentMessage>,
        payment: PaymentViewModel,
    ) {
        // An unassigned payment cannot be completed; leave the latch armed.
        if payment.payment_id > 0 && self.latch.should_auto_complete(&payment) {
            self.start_completion(context, &payment);
        }
        self.payment = Some(payment);
    }

    fn start_completion(
        &mut self,
        context: &ScreenContext<PaymentSnapshot, PaymentMessage>,
        payment: &PaymentViewModel,
    ) {
        tracing::info!(
            "Auto-completing online payment {} for ticket {}",
            payment.payment_id,
            payment.ticket_id
        );
        self.completing = true;

        let source = self.source.clone();
        let session = self.session.clone();
        let payment_id = payment.payment_id;
        let ticket_id = payment.ticket_id.clone();
        context.spawn_reply(
            "payment completion",
            async move {
                match source.complete_payment(&session, payment_id).await {
                    Ok(()) => PaymentOutcome::Success {
                        payment_id,
                        ticket_id,
                    },
                    Err(e) => {
                        tracing::warn!("Payment {} completion failed: {}", payment_id, e);
                        PaymentOutcome::Failure {
                            payment_id,
                            reason: e.notice(),
                        }
                    }
                }
            },
            PaymentMessage::CompletionFinished,
        );
    }

    /// Settle the cached copy locally until the backend reports it.
    fn mark_completed(&mut self, payment_id: i64) {
        if let Some(payment) = self
            .payment
            .as_mut()
            .filter(|p| p.payment_id == payment_id)
        {
            payment.status = PAYMENT_STATUS_COMPLETED.to_string();
        }
    }

    fn snapshot(&self) -> PaymentSnapshot {
        let phase = if self.fetches_in_flight > 0 && self.payment.is_none() {
            ListPhase::Loading
        } else if self.payment.is_some() {
            ListPhase::Ready
        } else {
            ListPhase::Empty
        };

        PaymentSnapshot {
            phase,
            payment: self.payment.as_ref().map(bind_payment),
            completing: self.completing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::sync::{ChangeType, ChannelFeed};
    use crate::shared::constants::{AWAITING_CASH_LABEL, PAID_LABEL};
    use crate::shared::test_helpers::{fake_payment, test_session, StubPaymentSource};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(2);

    fn open(
        source: &Arc<StubPaymentSource>,
        feed: &Arc<ChannelFeed<PaymentViewModel>>,
    ) -> PaymentHandle {
        PaymentScreen::open(PaymentDeps {
            session: test_session(),
            ticket_id: "TCK-100".to_string(),
            source: source.clone(),
            feed: feed.clone(),
        })
    }

    async fn next_event(screen: &mut PaymentHandle) -> ScreenEvent {
        tokio::time::timeout(WAIT, screen.next_event())
            .await
            .expect("timed out waiting for payment event")
            .expect("payment screen stopped")
    }

    async fn wait_until<P>(screen: &mut PaymentHandle, predicate: P) -> PaymentSnapshot
    where
        P: FnMut(&PaymentSnapshot) -> bool,
    {
        tokio::time::timeout(WAIT, screen.wait_for(predicate))
            .await
            .expect("timed out waiting for payment screen")
            .expect("payment screen stopped")
    }

    async fn wait_for_subscriber(feed: &ChannelFeed<PaymentViewModel>) {
        for _ in 0..100 {
            if feed.subscriber_count() > 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("screen never subscribed to the payment feed");
    }

    #[tokio::test]
    async fn test_online_payment_completes_once() {
        let payment = fake_payment("TCK-100", "online");
        let source = Arc::new(StubPaymentSource::with_payment(payment.clone()));
        let feed = Arc::new(ChannelFeed::new(16));
        let mut screen = open(&source, &feed);

        let event = next_event(&mut screen).await;
        assert_eq!(
            event,
            ScreenEvent::Navigate(PaymentOutcome::Success {
                payment_id: payment.payment_id,
                ticket_id: "TCK-100".to_string(),
            })
        );

        // Same pending payment observed again through the feed
        wait_for_subscriber(&feed).await;
        feed.publish(ChangeType::Modified, payment.clone());
        wait_until(&mut screen, |s| !s.completing && s.payment.is_some()).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(source.completions(), vec![payment.payment_id]);
        screen.teardown().await;
    }

    #[tokio::test]
    async fn test_successful_completion_settles_cached_payment() {
        let payment = fake_payment("TCK-100", "online");
        let source = Arc::new(StubPaymentSource::with_payment(payment));
        let feed = Arc::new(ChannelFeed::new(16));
        let mut screen = open(&source, &feed);

        next_event(&mut screen).await;
        let snapshot = wait_until(&mut screen, |s| !s.completing && s.payment.is_some()).await;
        let bound = snapshot.payment.unwrap();
        assert_eq!(bound.action_label, PAID_LABEL);
        assert!(!bound.action_enabled);

        screen.teardown().await;
    }

    #[tokio::test]
    async fn test_refresh_without_payment_clears_row() {
        let payment = fake_payment("TCK-100", "cash");
        let source = Arc::new(StubPaymentSource::with_payment(payment));
        let feed = Arc::new(ChannelFeed::new(16));
        let mut screen = open(&source, &feed);

        wait_until(&mut screen, |s| s.payment.is_some()).await;

        *source.payment.lock().unwrap() = None;
        screen.refresh().await;

        let snapshot = wait_until(&mut screen, |s| s.payment.is_none()).await;
        assert_eq!(snapshot.phase, ListPhase::Empty);
        assert!(source.completions().is_empty());

        screen.teardown().await;
    }

    #[tokio::test]
    async fn test_cash_payment_waits_for_collection() {
        let payment = fake_payment("TCK-100", "cash");
        let source = Arc::new(StubPaymentSource::with_payment(payment.clone()));
        let feed = Arc::new(ChannelFeed::new(16));
        let mut screen = open(&source, &feed);

        let snapshot = wait_until(&mut screen, |s| s.payment.is_some()).await;
        let bound = snapshot.payment.unwrap();
        assert_eq!(bound.action_label, AWAITING_CASH_LABEL);
        assert!(!bound.action_enabled);
        assert!(!snapshot.completing);

        wait_for_subscriber(&feed).await;
        feed.publish(ChangeType::Modified, payment);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(source.completions().is_empty());
        screen.teardown().await;
    }

    #[tokio::test]
    async fn test_feed_delivered_payment_triggers_completion() {
        let source = Arc::new(StubPaymentSource::default());
        let feed = Arc::new(ChannelFeed::new(16));
        let mut screen = open(&source, &feed);

        let empty = wait_until(&mut screen, |s| s.phase == ListPhase::Empty).await;
        assert!(empty.payment.is_none());

        wait_for_subscriber(&feed).await;
        let mut other_ticket = fake_payment("TCK-200", "online");
        other_ticket.payment_id = 1;
        feed.publish(ChangeType::Added, other_ticket);

        let payment = fake_payment("TCK-100", "Online");
        feed.publish(ChangeType::Added, payment.clone());

        let event = next_event(&mut screen).await;
        assert!(matches!(
            event,
            ScreenEvent::Navigate(PaymentOutcome::Success { payment_id, .. }) if payment_id == payment.payment_id
        ));
        assert_eq!(source.completions(), vec![payment.payment_id]);

        screen.teardown().await;
    }

    #[tokio::test]
    async fn test_completion_failure_navigates_without_retry() {
        let payment = fake_payment("TCK-100", "online");
        let source = Arc::new(StubPaymentSource::with_payment(payment.clone()));
        source.fail_completion.store(true, Ordering::SeqCst);
        let feed = Arc::new(ChannelFeed::new(16));
        let mut screen = open(&source, &feed);

        let event = next_event(&mut screen).await;
        assert_eq!(
            event,
            ScreenEvent::Navigate(PaymentOutcome::Failure {
                payment_id: payment.payment_id,
                reason: "Payment already completed".to_string(),
            })
        );

        screen.refresh().await;
        wait_until(&mut screen, |s| s.phase == ListPhase::Ready && !s.completing).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(source.completions().len(), 1);

        screen.teardown().await;
    }

    #[tokio::test]
    async fn test_reopened_screen_gets_fresh_latch() {
        let payment = fake_payment("TCK-100", "online");
        let source = Arc::new(StubPaymentSource::with_payment(payment.clone()));
        let feed = Arc::new(ChannelFeed::new(16));

        let mut first = open(&source, &feed);
        next_event(&mut first).await;
        first.teardown().await;

        let mut second = open(&source, &feed);
        next_event(&mut second).await;
        second.teardown().await;

        assert_eq!(
            source.completions(),
            vec![payment.payment_id, payment.payment_id]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_a_notice() {
        let source = Arc::new(StubPaymentSource::default());
        source.fail_fetch.store(true, Ordering::SeqCst);
        let feed = Arc::new(ChannelFeed::new(16));
        let mut screen = open(&source, &feed);

        let event = next_event(&mut screen).await;
        assert!(matches!(event, ScreenEvent::Notice(_)));

        let snapshot = wait_until(&mut screen, |s| s.phase != ListPhase::Loading).await;
        assert_eq!(snapshot.phase, ListPhase::Empty);

        screen.teardown().await;
    }
}
