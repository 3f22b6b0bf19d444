use serde::Serialize;

use crate::features::payments::models::PaymentViewModel;
use crate::shared::constants::{
    AWAITING_CASH_LABEL, DEFAULT_TICKET_LABEL, PAID_LABEL, PAYMENT_UNAVAILABLE_LABEL,
    PAY_NOW_LABEL,
};

/// Display fields of a payment and its action control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundPayment {
    pub ticket_id: String,
    pub service_name: String,
    pub technician_name: Option<String>,
    pub amount_text: String,
    pub action_label: String,
    pub action_enabled: bool,
}

/// Render a payment. Pure.
pub fn bind_payment(payment: &PaymentViewModel) -> BoundPayment {
    let (action_label, action_enabled) = if payment.is_completed() {
        (PAID_LABEL, false)
    } else if payment.is_pending() && payment.is_cash() {
        (AWAITING_CASH_LABEL, false)
    } else if payment.is_actionable() {
        (PAY_NOW_LABEL, true)
    } else {
        (PAYMENT_UNAVAILABLE_LABEL, false)
    };

    BoundPayment {
        ticket_id: payment.ticket_id.clone(),
        service_name: payment
            .service_name
            .clone()
            .unwrap_or_else(|| DEFAULT_TICKET_LABEL.to_string()),
        technician_name: payment.technician_name.clone(),
        amount_text: format!("{:.2}", payment.amount),
        action_label: action_label.to_string(),
        action_enabled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(method: &str, status: &str) -> PaymentViewModel {
        PaymentViewModel {
            payment_id: 3,
            ticket_id: "TCK-100".to_string(),
            amount: 1250.5,
            status: status.to_string(),
            payment_method: Some(method.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_cash_pending_awaits_collection() {
        let bound = bind_payment(&payment("cash", "pending"));
        assert_eq!(bound.action_label, "Awaiting Cash Collection");
        assert!(!bound.action_enabled);
    }

    #[test]
    fn test_online_pending_is_payable() {
        let bound = bind_payment(&payment("online", "pending"));
        assert_eq!(bound.action_label, PAY_NOW_LABEL);
        assert!(bound.action_enabled);
        assert_eq!(bound.amount_text, "1250.50");
    }

    #[test]
    fn test_completed_is_paid() {
        let bound = bind_payment(&payment("online", "completed"));
        assert_eq!(bound.action_label, PAID_LABEL);
        assert!(!bound.action_enabled);
    }

    #[test]
    fn test_unassigned_payment_not_ready() {
        let mut p = payment("online", "pending");
        p.payment_id = 0;
        let bound = bind_payment(&p);
        assert_eq!(bound.action_label, PAYMENT_UNAVAILABLE_LABEL);
        assert!(!bound.action_enabled);
        assert_eq!(bound.service_name, "Service Request");
    }
}
