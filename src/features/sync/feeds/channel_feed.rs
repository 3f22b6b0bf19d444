use futures::stream::{BoxStream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::features::sync::feeds::{
    Change, ChangeEnvelope, ChangeType, FeedFilter, LiveFeed, Scoped,
};

/// In-process push feed.
///
/// Whatever bridges the realtime document store publishes here; every
/// subscriber receives the changes its filter accepts. A subscriber that falls
/// more than `capacity` events behind skips the missed events.
pub struct ChannelFeed<T> {
    sender: broadcast::Sender<ChangeEnvelope<T>>,
}

impl<T: Clone + Send + 'static> ChannelFeed<T> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns how many subscribers the change was delivered to.
    pub fn publish(&self, change_type: ChangeType, record: T) -> usize {
        self.sender
            .send(ChangeEnvelope {
                change_type,
                record,
            })
            .unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T> LiveFeed<T> for ChannelFeed<T>
where
    T: Scoped + Clone + Send + Sync + 'static,
{
    fn subscribe(&self, filter: FeedFilter) -> BoxStream<'static, Change<T>> {
        BroadcastStream::new(self.sender.subscribe())
            .filter_map(move |received| {
                let change = match received {
                    Ok(envelope) if filter.accepts(&envelope.record) => Some(Change::from(envelope)),
                    Ok(_) => None,
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        tracing::warn!("Live feed subscriber lagged, skipped {} events", skipped);
                        None
                    }
                };
                futures::future::ready(change)
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tickets::models::TicketRecord;

    fn record(id: &str, email: &str) -> TicketRecord {
        TicketRecord {
            ticket_id: id.to_string(),
            raw_status: Some("open".to_string()),
            customer_email: Some(email.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_delivers_only_matching_changes() {
        let feed: ChannelFeed<TicketRecord> = ChannelFeed::new(16);
        let mut stream = feed.subscribe(FeedFilter::customer("ana@example.com"));

        feed.publish(ChangeType::Added, record("TCK-1", "ben@example.com"));
        feed.publish(ChangeType::Added, record("TCK-2", "ana@example.com"));
        feed.publish(ChangeType::Removed, record("TCK-2", "ana@example.com"));

        let first = stream.next().await.unwrap();
        assert_eq!(first, Change::Added(record("TCK-2", "ana@example.com")));

        let second = stream.next().await.unwrap();
        assert_eq!(second, Change::Removed("TCK-2".to_string()));
    }

    #[tokio::test]
    async fn test_dropping_stream_unsubscribes() {
        let feed: ChannelFeed<TicketRecord> = ChannelFeed::new(4);
        let stream = feed.subscribe(FeedFilter::customer("ana@example.com"));
        assert_eq!(feed.subscriber_count(), 1);

        drop(stream);
        assert_eq!(feed.subscriber_count(), 0);
        assert_eq!(
            feed.publish(ChangeType::Added, record("TCK-1", "ana@example.com")),
            0
        );
    }
}
