use serde::{Deserialize, Serialize};

use crate::features::payments::models::PaymentViewModel;

/// Payload of the payment detail endpoint
#[derive(Debug, Deserialize)]
pub struct PaymentDetailBody {
    #[serde(default)]
    pub payment: Option<PaymentViewModel>,
}

/// Payload of the payment history endpoint
#[derive(Debug, Deserialize)]
pub struct PaymentListBody {
    #[serde(default)]
    pub payments: Vec<PaymentViewModel>,
}

/// Request DTO for completing a payment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePaymentDto {
    pub payment_id: i64,
}

/// Completion carries nothing besides the envelope's `success` flag
#[derive(Debug, Default, Deserialize)]
pub struct CompletePaymentBody {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_body_without_payment() {
        let body: PaymentDetailBody = serde_json::from_str("{}").unwrap();
        assert!(body.payment.is_none());
    }

    #[test]
    fn test_complete_request_shape() {
        let value = serde_json::to_value(CompletePaymentDto { payment_id: 42 }).unwrap();
        assert_eq!(value, serde_json::json!({ "paymentId": 42 }));
    }
}
