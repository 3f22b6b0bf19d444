use std::sync::Arc;
use tokio::sync::Mutex;

use crate::features::tickets::models::TicketViewModel;

/// One-slot handoff of an optimistic ticket from the creation flow to the
/// next ticket list screen.
///
/// Clones share the same slot. A later `set_pending` overwrites an undrained
/// value; `drain` takes the value out so a second drain sees nothing.
#[derive(Debug, Clone, Default)]
pub struct PendingTicketSlot {
    inner: Arc<Mutex<Option<TicketViewModel>>>,
}

impl PendingTicketSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_pending(&self, ticket: TicketViewModel) {
        let mut slot = self.inner.lock().await;
        if let Some(ref previous) = *slot {
            tracing::debug!(
                "Pending ticket {} superseded by {} before being drained",
                previous.ticket_id,
                ticket.ticket_id
            );
        }
        *slot = Some(ticket);
    }

    /// Read and clear in one step.
    pub async fn drain(&self) -> Option<TicketViewModel> {
        self.inner.lock().await.take()
    }
}
