pub mod payment;
pub mod payment_history;
pub mod runtime;
pub mod ticket_list;

pub use payment::{PaymentDeps, PaymentHandle, PaymentScreen, PaymentSnapshot};
pub use payment_history::{
    PaymentHistoryDeps, PaymentHistoryHandle, PaymentHistoryScreen, PaymentHistorySnapshot,
};
pub use runtime::{ListPhase, ScreenEvent, ScreenHandle, ScreenMessage, ScreenUpdate};
pub use ticket_list::{TicketListDeps, TicketListHandle, TicketListScreen, TicketListSnapshot};
