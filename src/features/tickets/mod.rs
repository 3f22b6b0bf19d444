pub mod clients;
pub mod dtos;
pub mod models;
pub mod services;

pub use clients::{TicketSnapshots, TicketSource};
pub use models::{DisplayStatus, TicketRecord, TicketViewModel};
pub use services::{bind, normalize, BoundTicket, ColorToken, TicketService};
