use std::sync::Arc;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::backend::Session;
use crate::features::sync::{FeedFilter, SnapshotSource};
use crate::features::tickets::dtos::{CreateTicketDto, TicketCreatedBody};
use crate::features::tickets::models::TicketRecord;

/// REST operations on tickets.
#[async_trait]
pub trait TicketSource: Send + Sync {
    /// Full ticket list for the session's customer, in backend order.
    async fn fetch_tickets(&self, session: &Session) -> Result<Vec<TicketRecord>>;

    async fn create_ticket(
        &self,
        session: &Session,
        request: &CreateTicketDto,
    ) -> Result<TicketCreatedBody>;
}

/// Exposes a [`TicketSource`] as a snapshot source for the polling feed.
pub struct TicketSnapshots<S: ?Sized> {
    source: Arc<S>,
    session: Session,
}

impl<S: ?Sized> TicketSnapshots<S> {
    pub fn new(source: Arc<S>, session: Session) -> Self {
        Self { source, session }
    }
}

#[async_trait]
impl<S> SnapshotSource<TicketRecord> for TicketSnapshots<S>
where
    S: TicketSource + ?Sized,
{
    async fn snapshot(&self, filter: &FeedFilter) -> Result<Vec<TicketRecord>> {
        let tickets = self.source.fetch_tickets(&self.session).await?;
        Ok(tickets
            .into_iter()
            .filter(|ticket| filter.accepts(ticket))
            .collect())
    }
}
