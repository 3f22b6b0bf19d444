pub mod status_normalizer;
pub mod ticket_service;
pub mod view_binder;

pub use status_normalizer::normalize;
pub use ticket_service::TicketService;
pub use view_binder::{bind, BoundTicket, ColorToken};
