use serde::{Deserialize, Serialize};

use crate::features::sync::{Keyed, Scoped};
use crate::shared::constants::{
    PAYMENT_METHOD_CASH, PAYMENT_METHOD_ONLINE, PAYMENT_STATUS_COMPLETED, PAYMENT_STATUS_PENDING,
};

/// Payment attached to a ticket, as delivered by REST and the live feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentViewModel {
    /// 0 until the backend assigns an id
    #[serde(default)]
    pub payment_id: i64,
    pub ticket_id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician_name: Option<String>,
    /// "pending" or "completed", controlled by the backend
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

impl PaymentViewModel {
    pub fn is_pending(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(PAYMENT_STATUS_PENDING)
    }

    pub fn is_completed(&self) -> bool {
        self.status
            .trim()
            .eq_ignore_ascii_case(PAYMENT_STATUS_COMPLETED)
    }

    pub fn is_online(&self) -> bool {
        self.method_is(PAYMENT_METHOD_ONLINE)
    }

    pub fn is_cash(&self) -> bool {
        self.method_is(PAYMENT_METHOD_CASH)
    }

    /// Whether the "continue/pay" control may be enabled.
    pub fn is_actionable(&self) -> bool {
        self.payment_id > 0 && self.amount > 0.0 && self.is_pending()
    }

    fn method_is(&self, method: &str) -> bool {
        self.payment_method
            .as_deref()
            .map(|m| m.trim().eq_ignore_ascii_case(method))
            .unwrap_or(false)
    }
}

impl Keyed for PaymentViewModel {
    fn key(&self) -> &str {
        &self.ticket_id
    }
}

impl Scoped for PaymentViewModel {
    fn ticket_id(&self) -> &str {
        &self.ticket_id
    }

    fn customer_email(&self) -> Option<&str> {
        self.customer_email.as_deref()
    }
}

/// Where the payment screen navigates after a completion attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum PaymentOutcome {
    Success { payment_id: i64, ticket_id: String },
    Failure { payment_id: i64, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(id: i64, amount: f64, status: &str) -> PaymentViewModel {
        PaymentViewModel {
            payment_id: id,
            ticket_id: "TCK-100".to_string(),
            amount,
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_actionable_requires_id_amount_and_pending() {
        assert!(payment(7, 1500.0, "pending").is_actionable());
        assert!(!payment(0, 1500.0, "pending").is_actionable());
        assert!(!payment(7, 0.0, "pending").is_actionable());
        assert!(!payment(7, 1500.0, "completed").is_actionable());
    }

    #[test]
    fn test_method_matching_is_case_insensitive() {
        let mut p = payment(1, 10.0, "pending");
        p.payment_method = Some("Online".to_string());
        assert!(p.is_online());
        assert!(!p.is_cash());

        p.payment_method = Some("CASH".to_string());
        assert!(p.is_cash());

        p.payment_method = None;
        assert!(!p.is_online() && !p.is_cash());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "ticketId": "TCK-100",
            "status": "pending",
            "paymentMethod": "online"
        }"#;
        let p: PaymentViewModel = serde_json::from_str(json).unwrap();
        assert_eq!(p.payment_id, 0);
        assert_eq!(p.amount, 0.0);
        assert!(p.is_pending() && p.is_online());
        assert!(!p.is_actionable());
    }
}
