pub mod payment;

pub use payment::{PaymentOutcome, PaymentViewModel};
