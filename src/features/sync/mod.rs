pub mod feeds;
pub mod pending_slot;
pub mod store;

pub use feeds::{
    Change, ChangeType, ChannelFeed, FeedFilter, FeedSubscription, LiveFeed, PollingFeed,
    Scoped, SnapshotSource,
};
pub use pending_slot::PendingTicketSlot;
pub use store::{Keyed, ReconciliationStore};
