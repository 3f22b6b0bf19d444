use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::backend::{ServiceHubClient, Session};
use crate::features::payments::clients::PaymentSource;
use crate::features::payments::dtos::{
    CompletePaymentBody, CompletePaymentDto, PaymentDetailBody, PaymentListBody,
};
use crate::features::payments::models::PaymentViewModel;
use crate::shared::types::PaginationQuery;

#[async_trait]
impl PaymentSource for ServiceHubClient {
    async fn fetch_payment(
        &self,
        session: &Session,
        ticket_id: &str,
    ) -> Result<Option<PaymentViewModel>> {
        let url = self.url(&format!(
            "/api/payments/ticket/{}",
            urlencoding::encode(ticket_id)
        ));
        let (body, _): (PaymentDetailBody, _) = self.get_json(session, &url).await?;
        Ok(body.payment)
    }

    async fn fetch_payments(&self, session: &Session) -> Result<Vec<PaymentViewModel>> {
        let page = PaginationQuery::default();
        let url = self.url(&format!(
            "/api/payments?customerEmail={}&page={}&pageSize={}",
            urlencoding::encode(session.customer_email()),
            page.page,
            page.limit()
        ));
        let (body, _): (PaymentListBody, _) = self.get_json(session, &url).await?;
        Ok(body.payments)
    }

    async fn complete_payment(&self, session: &Session, payment_id: i64) -> Result<()> {
        let url = self.url("/api/payments/complete");
        let (_, _): (CompletePaymentBody, _) = self
            .post_json(session, &url, &CompletePaymentDto { payment_id })
            .await?;

        tracing::info!(
            "Payment {} completed for {}",
            payment_id,
            session.customer_email()
        );
        Ok(())
    }
}
