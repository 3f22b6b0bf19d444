pub mod change;
pub mod channel_feed;
pub mod polling_feed;

use futures::stream::{BoxStream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use change::{diff_snapshots, Change, ChangeEnvelope, ChangeType, FeedFilter, Scoped};
pub use channel_feed::ChannelFeed;
pub use polling_feed::{PollingFeed, SnapshotSource};

/// Push-based source of incremental changes for records of type `T`.
///
/// Dropping the returned stream ends the subscription.
pub trait LiveFeed<T>: Send + Sync {
    fn subscribe(&self, filter: FeedFilter) -> BoxStream<'static, Change<T>>;
}

/// A live feed subscription pumping changes into a screen's inbox.
///
/// `unregister` is idempotent and also runs on drop. After it returns no
/// further changes are forwarded.
pub struct FeedSubscription {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl FeedSubscription {
    pub fn forward<T, M, F>(
        name: &'static str,
        mut changes: BoxStream<'static, Change<T>>,
        inbox: mpsc::Sender<M>,
        wrap: F,
    ) -> Self
    where
        T: Send + 'static,
        M: Send + 'static,
        F: Fn(Change<T>) -> M + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            while let Some(change) = changes.next().await {
                if inbox.send(wrap(change)).await.is_err() {
                    tracing::debug!("{} feed: screen inbox closed, stopping", name);
                    break;
                }
            }
        });

        tracing::debug!("{} feed subscribed", name);

        Self {
            name,
            handle: Some(handle),
        }
    }

    pub fn unregister(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("{} feed unregistered", self.name);
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.unregister();
    }
}
