pub mod clients;
pub mod dtos;
pub mod models;
pub mod services;

pub use clients::{PaymentSnapshots, PaymentSource};
pub use models::{PaymentOutcome, PaymentViewModel};
pub use services::{bind_payment, AutoCompleteLatch, BoundPayment};
