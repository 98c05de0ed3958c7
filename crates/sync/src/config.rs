//! Sync core configuration.

use crate::event::{TipEvent, TipEventSender, tip_event_channel};
use tokio::sync::mpsc;

/// Default capacity of the tip event channel.
///
/// The catch-up phase does not consume events, so the buffer must
/// absorb whatever gossip arrives while the node covers the last
/// stretch of history.
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Configuration for the sync core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Capacity of the tip event channel. Events arriving while the
    /// channel is full are dropped by the producer.
    pub event_channel_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY }
    }
}

impl SyncConfig {
    /// Creates the tip event channel sized by this configuration.
    pub fn tip_event_channel(&self) -> (TipEventSender, mpsc::Receiver<TipEvent>) {
        tip_event_channel(self.event_channel_capacity)
    }
}
