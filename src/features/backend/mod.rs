pub mod client;
pub mod session;

pub use client::ServiceHubClient;
pub use session::Session;
