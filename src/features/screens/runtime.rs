use std::future::Future;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::core::error::AppError;
use crate::features::payments::models::PaymentOutcome;

/// Inbox capacity of a screen actor
pub const SCREEN_INBOX_CAPACITY: usize = 64;

/// Pending one-off events kept for a screen's owner
const EVENT_CAPACITY: usize = 32;

/// Whether a list screen is waiting on the backend or showing data.
///
/// `Empty` is a successful result with no rows, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListPhase {
    Loading,
    Ready,
    Empty,
}

impl ListPhase {
    pub fn settled(row_count: usize) -> Self {
        if row_count == 0 {
            ListPhase::Empty
        } else {
            ListPhase::Ready
        }
    }
}

/// One-off output of a screen, consumed once by its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenEvent {
    /// Transient user-visible message (toast)
    Notice(String),
    /// Leave the screen for a success/failure view
    Navigate(PaymentOutcome),
}

/// Either a new rendered state or a one-off event.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenUpdate<S> {
    Snapshot(S),
    Event(ScreenEvent),
}

/// Messages every screen understands, in addition to its own.
pub trait ScreenMessage: Send + 'static {
    fn refresh() -> Self;
    fn teardown() -> Self;
}

/// Owner-side handle of a running screen actor.
///
/// Dropping the handle without calling [`ScreenHandle::teardown`] aborts the
/// actor, which unregisters its feed subscriptions.
pub struct ScreenHandle<S, M> {
    name: &'static str,
    inbox: mpsc::Sender<M>,
    snapshots: watch::Receiver<S>,
    events: mpsc::Receiver<ScreenEvent>,
    task: Option<JoinHandle<()>>,
}

impl<S, M> ScreenHandle<S, M>
where
    S: Clone + Send + Sync + 'static,
    M: ScreenMessage,
{
    /// Spawn `run` as the actor of a new screen.
    pub(crate) fn spawn<F, Fut>(name: &'static str, initial: S, run: F) -> Self
    where
        F: FnOnce(ScreenContext<S, M>, mpsc::Receiver<M>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (inbox_tx, inbox_rx) = mpsc::channel(SCREEN_INBOX_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);
        let (event_tx, event_rx) = mpsc::channel(EVENT_CAPACITY);

        let context = ScreenContext {
            name,
            inbox: inbox_tx.clone(),
            snapshots: snapshot_tx,
            events: event_tx,
        };
        let task = tokio::spawn(run(context, inbox_rx));

        Self {
            name,
            inbox: inbox_tx,
            snapshots: snapshot_rx,
            events: event_rx,
            task: Some(task),
        }
    }

    /// Ask the screen to refetch from the backend (pull-to-refresh).
    pub async fn refresh(&self) {
        if self.inbox.send(M::refresh()).await.is_err() {
            tracing::debug!("{} screen is gone, refresh ignored", self.name);
        }
    }

    /// Stop the screen and wait for it to finish. Safe to call more than once.
    pub async fn teardown(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        if self.inbox.send(M::teardown()).await.is_err() {
            tracing::debug!("{} screen already stopped", self.name);
        }

        if let Err(e) = task.await {
            if !e.is_cancelled() {
                tracing::error!("{} screen task failed: {:?}", self.name, e);
            }
        }
    }

    pub fn is_alive(&self) -> bool {
        self.task
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Latest rendered state.
    pub fn snapshot(&self) -> S {
        self.snapshots.borrow().clone()
    }

    /// Wait until the rendered state satisfies `predicate`.
    ///
    /// Returns `None` once the screen has stopped without reaching it.
    pub async fn wait_for<P>(&mut self, predicate: P) -> Option<S>
    where
        P: FnMut(&S) -> bool,
    {
        self.snapshots
            .wait_for(predicate)
            .await
            .ok()
            .map(|state| state.clone())
    }

    /// Wait for the next state change.
    pub async fn changed(&mut self) -> Option<S> {
        self.snapshots.changed().await.ok()?;
        Some(self.snapshots.borrow_and_update().clone())
    }

    /// Next state change or event, whichever comes first. `None` once the
    /// screen has stopped.
    pub async fn next_update(&mut self) -> Option<ScreenUpdate<S>> {
        enum Woke {
            Event(Option<ScreenEvent>),
            Changed(bool),
        }

        let woke = tokio::select! {
            event = self.events.recv() => Woke::Event(event),
            changed = self.snapshots.changed() => Woke::Changed(changed.is_ok()),
        };

        match woke {
            Woke::Event(Some(event)) => Some(ScreenUpdate::Event(event)),
            Woke::Changed(true) => Some(ScreenUpdate::Snapshot(
                self.snapshots.borrow_and_update().clone(),
            )),
            Woke::Event(None) => None,
            Woke::Changed(false) => self.events.try_recv().ok().map(ScreenUpdate::Event),
        }
    }

    /// Next one-off event, or `None` once the screen has stopped and all
    /// events were consumed.
    pub async fn next_event(&mut self) -> Option<ScreenEvent> {
        self.events.recv().await
    }
}

impl<S, M> Drop for ScreenHandle<S, M> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Actor-side channels of a screen.
pub struct ScreenContext<S, M> {
    name: &'static str,
    inbox: mpsc::Sender<M>,
    snapshots: watch::Sender<S>,
    events: mpsc::Sender<ScreenEvent>,
}

impl<S, M> ScreenContext<S, M>
where
    M: Send + 'static,
{
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sender for background work that reports back to the actor.
    pub fn inbox(&self) -> mpsc::Sender<M> {
        self.inbox.clone()
    }

    pub fn publish(&self, snapshot: S) {
        self.snapshots.send_replace(snapshot);
    }

    pub fn emit(&self, event: ScreenEvent) {
        if let Err(e) = self.events.try_send(event) {
            tracing::debug!("{} screen dropped an event: {}", self.name, e);
        }
    }

    /// Convert a failure into a transient notice. Never fatal.
    pub fn notice(&self, context: &str, error: &AppError) {
        tracing::warn!("{} screen: {} failed: {}", self.name, context, error);
        self.emit(ScreenEvent::Notice(error.notice()));
    }

    /// Run `work` in the background and post its result to the inbox.
    ///
    /// A result arriving after teardown is dropped.
    pub fn spawn_reply<T, Fut, W>(&self, label: &'static str, work: Fut, wrap: W)
    where
        T: Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        W: FnOnce(T) -> M + Send + 'static,
    {
        let inbox = self.inbox.clone();
        let name = self.name;
        tokio::spawn(async move {
            let result = work.await;
            if inbox.send(wrap(result)).await.is_err() {
                tracing::debug!("{} screen is gone, dropping late {}", name, label);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug)]
    enum CounterMessage {
        Refresh,
        Add(u32),
        Teardown,
    }

    impl ScreenMessage for CounterMessage {
        fn refresh() -> Self {
            CounterMessage::Refresh
        }

        fn teardown() -> Self {
            CounterMessage::Teardown
        }
    }

    fn open_counter() -> ScreenHandle<u32, CounterMessage> {
        ScreenHandle::spawn("counter", 0, |context, mut inbox| async move {
            let mut total = 0u32;
            while let Some(message) = inbox.recv().await {
                match message {
                    CounterMessage::Refresh => {
                        context.spawn_reply("add", async { 5u32 }, CounterMessage::Add)
                    }
                    CounterMessage::Add(n) => total += n,
                    CounterMessage::Teardown => break,
                }
                context.publish(total);
            }
        })
    }

    #[test]
    fn test_list_phase_settled() {
        assert_eq!(ListPhase::settled(0), ListPhase::Empty);
        assert_eq!(ListPhase::settled(3), ListPhase::Ready);
    }

    #[tokio::test]
    async fn test_background_reply_reaches_actor() {
        let mut screen = open_counter();
        screen.refresh().await;

        let total = tokio::time::timeout(Duration::from_secs(1), screen.wait_for(|n| *n == 5))
            .await
            .unwrap();
        assert_eq!(total, Some(5));
        assert!(screen.is_alive());

        screen.teardown().await;
    }

    #[tokio::test]
    async fn test_next_update_reports_state_changes() {
        let mut screen = open_counter();
        screen.refresh().await;

        let mut last = None;
        while let Ok(Some(update)) =
            tokio::time::timeout(Duration::from_millis(200), screen.next_update()).await
        {
            if let ScreenUpdate::Snapshot(total) = update {
                last = Some(total);
                if total == 5 {
                    break;
                }
            }
        }
        assert_eq!(last, Some(5));

        screen.teardown().await;
        assert!(screen.next_update().await.is_none());
    }

    #[tokio::test]
    async fn test_teardown_is_idempotent() {
        let mut screen = open_counter();
        screen.teardown().await;
        assert!(!screen.is_alive());

        screen.teardown().await;
        screen.refresh().await;
        assert_eq!(screen.snapshot(), 0);
        assert!(screen.next_event().await.is_none());
    }
}
