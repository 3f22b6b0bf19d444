//! Features layer - one module per domain concern
//!
//! `tickets` and `payments` hold the domain types and REST seams, `sync` the
//! reconciliation primitives and live feeds, `screens` the per-screen actors.

pub mod backend;
pub mod payments;
pub mod screens;
pub mod sync;
pub mod tickets;
