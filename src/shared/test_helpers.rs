#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use fake::faker::lorem::en::Sentence;
#[cfg(test)]
use fake::faker::name::en::Name;
#[cfg(test)]
use fake::Fake;
#[cfg(test)]
use tokio::sync::Semaphore;

#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::backend::Session;
#[cfg(test)]
use crate::features::payments::clients::PaymentSource;
#[cfg(test)]
use crate::features::payments::models::PaymentViewModel;
#[cfg(test)]
use crate::features::tickets::clients::TicketSource;
#[cfg(test)]
use crate::features::tickets::dtos::{CreateTicketDto, TicketCreatedBody};
#[cfg(test)]
use crate::features::tickets::models::{TicketRecord, TicketViewModel};

#[cfg(test)]
const KNOWN_STATUSES: [&str; 5] = ["open", "active", "ongoing", "completed", "cancelled"];

#[cfg(test)]
pub const TEST_CUSTOMER: &str = "ana@example.com";

#[cfg(test)]
#[allow(dead_code)]
pub fn test_session() -> Session {
    Session::new("test-token", TEST_CUSTOMER)
}

#[cfg(test)]
#[allow(dead_code)]
pub fn fake_ticket(id: &str) -> TicketViewModel {
    let title: String = Sentence(2..5).fake();
    let status = KNOWN_STATUSES[(0..KNOWN_STATUSES.len()).fake::<usize>()];
    TicketViewModel::new(id)
        .with_title(title)
        .with_raw_status(status)
}

#[cfg(test)]
#[allow(dead_code)]
pub fn ticket_record(id: &str, status: &str) -> TicketRecord {
    TicketRecord {
        ticket_id: id.to_string(),
        raw_status: Some(status.to_string()),
        customer_email: Some(TEST_CUSTOMER.to_string()),
        ..Default::default()
    }
}

/// Pending payment with a real id and amount.
#[cfg(test)]
#[allow(dead_code)]
pub fn fake_payment(ticket_id: &str, method: &str) -> PaymentViewModel {
    PaymentViewModel {
        payment_id: (1..10_000i64).fake(),
        ticket_id: ticket_id.to_string(),
        amount: (100.0..5_000.0f64).fake(),
        service_name: Some(Sentence(1..3).fake()),
        technician_name: Some(Name().fake()),
        status: "pending".to_string(),
        payment_method: Some(method.to_string()),
        customer_email: Some(TEST_CUSTOMER.to_string()),
    }
}

/// Ticket source with scripted list responses.
///
/// A gated source holds every fetch until [`StubTicketSource::release`].
#[cfg(test)]
#[allow(dead_code)]
pub struct StubTicketSource {
    responses: Mutex<VecDeque<Result<Vec<TicketRecord>>>>,
    gate: Semaphore,
    fetches: AtomicUsize,
}

#[cfg(test)]
#[allow(dead_code)]
impl StubTicketSource {
    pub fn new() -> Self {
        Self::with_permits(Semaphore::MAX_PERMITS)
    }

    pub fn gated() -> Self {
        Self::with_permits(0)
    }

    fn with_permits(permits: usize) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            gate: Semaphore::new(permits),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, response: Result<Vec<TicketRecord>>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl TicketSource for StubTicketSource {
    async fn fetch_tickets(&self, _session: &Session) -> Result<Vec<TicketRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.gate
            .acquire()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?
            .forget();
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create_ticket(
        &self,
        _session: &Session,
        _request: &CreateTicketDto,
    ) -> Result<TicketCreatedBody> {
        Err(AppError::Network("create_ticket is not stubbed".to_string()))
    }
}

/// Payment source returning fixed data and recording completion calls.
#[cfg(test)]
#[allow(dead_code)]
#[derive(Default)]
pub struct StubPaymentSource {
    pub payment: Mutex<Option<PaymentViewModel>>,
    pub history: Mutex<Vec<PaymentViewModel>>,
    pub fail_fetch: AtomicBool,
    pub fail_completion: AtomicBool,
    completions: Mutex<Vec<i64>>,
}

#[cfg(test)]
#[allow(dead_code)]
impl StubPaymentSource {
    pub fn with_payment(payment: PaymentViewModel) -> Self {
        Self {
            payment: Mutex::new(Some(payment)),
            ..Default::default()
        }
    }

    pub fn completions(&self) -> Vec<i64> {
        self.completions.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl PaymentSource for StubPaymentSource {
    async fn fetch_payment(
        &self,
        _session: &Session,
        _ticket_id: &str,
    ) -> Result<Option<PaymentViewModel>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AppError::Auth("No access token available".to_string()));
        }
        Ok(self.payment.lock().unwrap().clone())
    }

    async fn fetch_payments(&self, _session: &Session) -> Result<Vec<PaymentViewModel>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AppError::Network("connection refused".to_string()));
        }
        Ok(self.history.lock().unwrap().clone())
    }

    async fn complete_payment(&self, _session: &Session, payment_id: i64) -> Result<()> {
        self.completions.lock().unwrap().push(payment_id);
        if self.fail_completion.load(Ordering::SeqCst) {
            return Err(AppError::BackendRejection {
                status: 400,
                message: "Payment already completed".to_string(),
            });
        }
        Ok(())
    }
}
