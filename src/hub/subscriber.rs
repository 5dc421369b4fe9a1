//! Subscriber queues and handles

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use super::GraphHub;
use crate::types::GraphEvent;

/// Item flowing through a subscriber queue.
#[derive(Debug, Clone)]
pub(crate) enum StreamItem {
    Event(Arc<GraphEvent>),
    /// Poison sentinel broadcast by `GraphHub::shutdown`.
    Shutdown,
}

/// Registry side of a subscription: the send half of its unbounded queue.
/// Broadcast is fire-and-forget; a send to a closed queue marks the
/// subscriber dead and the hub prunes it.
pub(crate) struct Subscriber {
    pub(crate) id: u64,
    pub(crate) tx: mpsc::UnboundedSender<StreamItem>,
}

/// Consumer side of a subscription.
///
/// Yields the catch-up replay first, then live events in broadcast order,
/// ending on the shutdown sentinel. Dropping the handle unsubscribes, so a
/// closed connection deregisters itself.
pub struct SubscriberHandle {
    id: u64,
    hub: Arc<GraphHub>,
    replay: VecDeque<Arc<GraphEvent>>,
    rx: mpsc::UnboundedReceiver<StreamItem>,
    finished: bool,
}

impl SubscriberHandle {
    pub(crate) fn new(
        id: u64,
        hub: Arc<GraphHub>,
        replay: VecDeque<Arc<GraphEvent>>,
        rx: mpsc::UnboundedReceiver<StreamItem>,
    ) -> Self {
        Self {
            id,
            hub,
            replay,
            rx,
            finished: false,
        }
    }

    /// The registry id of this subscription.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Events still pending from the catch-up replay.
    pub fn pending_replay(&self) -> usize {
        self.replay.len()
    }

    /// Receive the next event, suspending until one is available.
    /// Returns `None` once the hub has shut down.
    pub async fn recv(&mut self) -> Option<Arc<GraphEvent>> {
        futures::StreamExt::next(self).await
    }
}

impl Stream for SubscriberHandle {
    type Item = Arc<GraphEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }
        if let Some(event) = this.replay.pop_front() {
            return Poll::Ready(Some(event));
        }
        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(StreamItem::Event(event))) => Poll::Ready(Some(event)),
            Poll::Ready(Some(StreamItem::Shutdown)) | Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for SubscriberHandle {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
