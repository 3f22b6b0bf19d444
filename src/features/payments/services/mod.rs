pub mod auto_complete;
pub mod payment_binder;

pub use auto_complete::AutoCompleteLatch;
pub use payment_binder::{bind_payment, BoundPayment};
