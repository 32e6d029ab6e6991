//! In-process fan-out of support events to live subscribers
//!
//! A [`Subscription`] lives as long as its handle: dropping it (or calling
//! [`Subscription::unsubscribe`]) releases the underlying receiver.
//! [`RealtimeHub::listen`] runs a callback on a background task until the
//! returned [`ListenerHandle`] is unsubscribed or dropped.

use serde::Serialize;
use tokio::{sync::broadcast, task::JoinHandle};
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    Stream, StreamExt,
};
use uuid::Uuid;

use crate::models::support::{SupportMessage, SupportTicket};

const DEFAULT_CAPACITY: usize = 256;

/// Something that happened in the support tables
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SupportEvent {
    MessageInserted(SupportMessage),
    TicketChanged(SupportTicket),
}

impl SupportEvent {
    /// SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            SupportEvent::MessageInserted(_) => "message",
            SupportEvent::TicketChanged(_) => "ticket",
        }
    }

    fn matches(&self, topic: &Topic) -> bool {
        match (self, topic) {
            (SupportEvent::MessageInserted(msg), Topic::TicketMessages(id)) => msg.ticket_id == *id,
            (SupportEvent::TicketChanged(_), Topic::Tickets) => true,
            _ => false,
        }
    }
}

/// What a subscriber wants to hear about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    /// New messages of one ticket
    TicketMessages(Uuid),
    /// Any ticket created or changed
    Tickets,
}

#[derive(Clone)]
pub struct RealtimeHub {
    sender: broadcast::Sender<SupportEvent>,
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Deliver an event; returns how many subscribers were listening
    pub fn publish(&self, event: SupportEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self, topic: Topic) -> Subscription {
        tracing::debug!(?topic, "Realtime subscription opened");
        Subscription {
            topic,
            receiver: self.sender.subscribe(),
        }
    }

    /// Run `callback` for each matching event until the handle is released
    pub fn listen<F>(&self, topic: Topic, mut callback: F) -> ListenerHandle
    where
        F: FnMut(SupportEvent) + Send + 'static,
    {
        let mut subscription = self.subscribe(topic);
        let task = tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                callback(event);
            }
        });
        ListenerHandle { task }
    }

    /// Open subscriptions, listeners included
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

pub struct Subscription {
    topic: Topic,
    receiver: broadcast::Receiver<SupportEvent>,
}

impl Subscription {
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Next matching event; `None` once the hub is gone
    pub async fn recv(&mut self) -> Option<SupportEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.matches(&self.topic) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(topic = ?self.topic, skipped, "Realtime subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = SupportEvent> + Send + 'static {
        let topic = self.topic;
        BroadcastStream::new(self.receiver).filter_map(move |item| match item {
            Ok(event) if event.matches(&topic) => Some(event),
            Ok(_) => None,
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(?topic, skipped, "Realtime stream lagged");
                None
            }
        })
    }

    pub fn unsubscribe(self) {
        tracing::debug!(topic = ?self.topic, "Realtime subscription closed");
    }
}

pub struct ListenerHandle {
    task: JoinHandle<()>,
}

impl ListenerHandle {
    pub fn unsubscribe(self) {
        self.task.abort();
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
