pub mod payment_dto;

pub use payment_dto::{CompletePaymentBody, CompletePaymentDto, PaymentDetailBody, PaymentListBody};
