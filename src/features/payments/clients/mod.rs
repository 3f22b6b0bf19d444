pub mod payment_source;
mod rest_payment_client;

pub use payment_source::{PaymentSnapshots, PaymentSource};
