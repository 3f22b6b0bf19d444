use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::backend::Session;
use crate::features::sync::PendingTicketSlot;
use crate::features::tickets::clients::TicketSource;
use crate::features::tickets::dtos::{CreateTicketDto, TicketCreatedBody, TicketCreatedDto};
use crate::features::tickets::models::{TicketRecord, TicketViewModel};
use crate::shared::constants::NEW_TICKET_STATUS;

/// Service for ticket operations outside of a screen
pub struct TicketService {
    source: Arc<dyn TicketSource>,
    pending: PendingTicketSlot,
}

impl TicketService {
    pub fn new(source: Arc<dyn TicketSource>, pending: PendingTicketSlot) -> Self {
        Self { source, pending }
    }

    /// Submit a ticket and hand an optimistic row to the next list screen.
    pub async fn create(
        &self,
        session: &Session,
        request: CreateTicketDto,
    ) -> Result<TicketCreatedDto> {
        request.validate()?;

        let created = self.source.create_ticket(session, &request).await?;
        if created.ticket_id.trim().is_empty() {
            return Err(AppError::Decode(
                "Ticket creation response has no ticketId".to_string(),
            ));
        }

        let optimistic = Self::optimistic_view(&request, created);
        let result = TicketCreatedDto {
            ticket_id: optimistic.ticket_id.clone(),
            status: optimistic
                .raw_status
                .clone()
                .unwrap_or_else(|| NEW_TICKET_STATUS.to_string()),
        };

        tracing::info!(
            "Ticket created: id={}, status={}, customer={}",
            result.ticket_id,
            result.status,
            session.customer_email()
        );

        self.pending.set_pending(optimistic).await;

        Ok(result)
    }

    /// Full ticket list for the session's customer
    pub async fn list(&self, session: &Session) -> Result<Vec<TicketViewModel>> {
        let records = self.source.fetch_tickets(session).await?;
        Ok(records.into_iter().map(TicketViewModel::from).collect())
    }

    /// Build the row shown before the backend list confirms the ticket.
    ///
    /// The returned record wins where present; the request fills the gaps.
    fn optimistic_view(request: &CreateTicketDto, created: TicketCreatedBody) -> TicketViewModel {
        let TicketCreatedBody {
            ticket_id,
            status,
            ticket,
        } = created;

        let mut view = TicketViewModel::new(ticket_id.clone());
        view.title = Some(request.title.clone());
        view.service_type = Some(request.service_type.clone());
        view.raw_status = Some(NEW_TICKET_STATUS.to_string());

        if let Some(record) = ticket {
            view.apply(TicketRecord {
                ticket_id,
                ..record
            });
        }
        if status.is_some() {
            view.raw_status = status;
        }

        view
    }
}
