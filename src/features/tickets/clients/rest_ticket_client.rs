use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::backend::{ServiceHubClient, Session};
use crate::features::tickets::clients::TicketSource;
use crate::features::tickets::dtos::{CreateTicketDto, TicketCreatedBody, TicketListBody};
use crate::features::tickets::models::TicketRecord;
use crate::shared::constants::MAX_LIST_PAGES;
use crate::shared::types::PaginationQuery;

#[async_trait]
impl TicketSource for ServiceHubClient {
    /// Walks every page so the result can replace a screen's list wholesale.
    async fn fetch_tickets(&self, session: &Session) -> Result<Vec<TicketRecord>> {
        let mut page = PaginationQuery::full_scan();
        let mut tickets: Vec<TicketRecord> = Vec::new();

        loop {
            let url = self.url(&format!(
                "/api/tickets?customerEmail={}&page={}&pageSize={}",
                urlencoding::encode(session.customer_email()),
                page.page,
                page.limit()
            ));

            let (body, meta): (TicketListBody, _) = self.get_json(session, &url).await?;
            let received = body.tickets.len();
            tickets.extend(body.tickets);

            if page.is_last(received, tickets.len(), meta.as_ref()) {
                break;
            }
            if page.page >= MAX_LIST_PAGES {
                tracing::warn!(
                    "Ticket list for {} truncated at {} pages",
                    session.customer_email(),
                    MAX_LIST_PAGES
                );
                break;
            }
            page = page.next();
        }

        tracing::debug!(
            "Fetched {} tickets for {}",
            tickets.len(),
            session.customer_email()
        );

        Ok(tickets)
    }

    async fn create_ticket(
        &self,
        session: &Session,
        request: &CreateTicketDto,
    ) -> Result<TicketCreatedBody> {
        let url = self.url("/api/tickets");
        let (body, _) = self.post_json(session, &url, request).await?;
        Ok(body)
    }
}
