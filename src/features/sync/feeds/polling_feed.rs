use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_stream::wrappers::ReceiverStream;

use crate::core::config::FeedConfig;
use crate::core::error::Result;
use crate::features::sync::feeds::{diff_snapshots, Change, FeedFilter, LiveFeed};
use crate::features::sync::Keyed;

/// Anything that can produce a full snapshot for a filter.
#[async_trait]
pub trait SnapshotSource<T>: Send + Sync {
    async fn snapshot(&self, filter: &FeedFilter) -> Result<Vec<T>>;
}

/// Live feed built from periodic snapshots.
///
/// Each subscription runs its own poll task that diffs consecutive snapshots
/// into changes. The first snapshot arrives as all `Added`. A failed poll is
/// logged and skipped; the next tick tries again. The task exits once the
/// subscriber drops its stream.
pub struct PollingFeed<T, S> {
    source: Arc<S>,
    config: FeedConfig,
    _record: PhantomData<fn() -> T>,
}

impl<T, S> PollingFeed<T, S> {
    pub fn new(source: Arc<S>, config: FeedConfig) -> Self {
        Self {
            source,
            config,
            _record: PhantomData,
        }
    }
}

impl<T, S> LiveFeed<T> for PollingFeed<T, S>
where
    T: Keyed + PartialEq + Clone + Send + Sync + 'static,
    S: SnapshotSource<T> + 'static,
{
    fn subscribe(&self, filter: FeedFilter) -> BoxStream<'static, Change<T>> {
        let (tx, rx) = mpsc::channel(self.config.buffer);
        let source = Arc::clone(&self.source);
        let period = self.config.poll_interval;

        tokio::spawn(async move {
            poll_loop(source, filter, period, tx).await;
        });

        ReceiverStream::new(rx).boxed()
    }
}

async fn poll_loop<T, S>(
    source: Arc<S>,
    filter: FeedFilter,
    period: Duration,
    tx: mpsc::Sender<Change<T>>,
) where
    T: Keyed + PartialEq + Clone + Send + Sync + 'static,
    S: SnapshotSource<T> + 'static,
{
    tracing::debug!(
        "Starting polling feed for {} (every {:?})",
        filter.customer_email,
        period
    );

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut previous: Vec<T> = Vec::new();

    loop {
        tokio::select! {
            _ = tx.closed() => break,
            _ = ticker.tick() => {}
        }

        let current = match source.snapshot(&filter).await {
            Ok(current) => current,
            Err(e) => {
                tracing::warn!("Live feed poll failed: {}", e);
                continue;
            }
        };

        for change in diff_snapshots(&previous, &current) {
            if tx.send(change).await.is_err() {
                tracing::debug!("Polling feed subscriber gone, stopping");
                return;
            }
        }
        previous = current;
    }

    tracing::debug!("Polling feed for {} stopped", filter.customer_email);
}
