pub mod ticket;

pub use ticket::{DisplayStatus, TicketRecord, TicketViewModel};
