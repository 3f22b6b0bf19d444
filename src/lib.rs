//! Client-side ticket and payment reconciliation for ServiceHub.
//!
//! Each screen runs as its own actor. A one-shot REST fetch and a live change
//! feed both post messages to that actor, which merges them by ticket id into
//! a [`features::sync::ReconciliationStore`] and publishes bound view state.

pub mod core;
pub mod features;
pub mod shared;
