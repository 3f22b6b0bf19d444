mod rest_ticket_client;
pub mod ticket_source;

pub use ticket_source::{TicketSnapshots, TicketSource};
