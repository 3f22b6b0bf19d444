use std::sync::Arc;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::backend::Session;
use crate::features::payments::models::PaymentViewModel;
use crate::features::sync::{FeedFilter, SnapshotSource};

/// REST operations on payments.
#[async_trait]
pub trait PaymentSource: Send + Sync {
    /// Payment attached to `ticket_id`, if the backend has created one yet.
    async fn fetch_payment(
        &self,
        session: &Session,
        ticket_id: &str,
    ) -> Result<Option<PaymentViewModel>>;

    /// Recent payments of the session's customer.
    async fn fetch_payments(&self, session: &Session) -> Result<Vec<PaymentViewModel>>;

    /// Mark a payment as settled. No retry on failure.
    async fn complete_payment(&self, session: &Session, payment_id: i64) -> Result<()>;
}

/// Exposes a [`PaymentSource`] as a snapshot source for the polling feed.
///
/// A filter narrowed to one ticket reads that ticket's payment; otherwise the
/// customer's payment history is read.
pub struct PaymentSnapshots<S: ?Sized> {
    source: Arc<S>,
    session: Session,
}

impl<S: ?Sized> PaymentSnapshots<S> {
    pub fn new(source: Arc<S>, session: Session) -> Self {
        Self { source, session }
    }
}

#[async_trait]
impl<S> SnapshotSource<PaymentViewModel> for PaymentSnapshots<S>
where
    S: PaymentSource + ?Sized,
{
    async fn snapshot(&self, filter: &FeedFilter) -> Result<Vec<PaymentViewModel>> {
        let payments = match filter.ticket_id.as_deref() {
            Some(ticket_id) => self
                .source
                .fetch_payment(&self.session, ticket_id)
                .await?
                .into_iter()
                .collect(),
            None => self.source.fetch_payments(&self.session).await?,
        };

        Ok(payments
            .into_iter()
            .filter(|payment| filter.accepts(payment))
            .collect())
    }
}
