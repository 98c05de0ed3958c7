//! Tip events and the bounded channel that carries them.

use crate::{Metrics, client::PeerId};
use alloy_primitives::B256;
use sabal_chain::{Block, Waypoint};
use tokio::sync::mpsc;

/// A block hash announcement gossiped by a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHashAnnouncement {
    /// The announced block hash.
    pub hash: B256,
    /// The announced block number.
    pub number: u64,
}

/// Events that drive the live sync loop.
///
/// The driver processes events strictly in arrival order; producers are
/// responsible for any desired coalescing.
#[derive(Debug, Clone, PartialEq)]
pub enum TipEvent {
    /// The attestation service produced a new milestone.
    NewMilestone(Waypoint),
    /// A peer gossiped a full new block.
    NewBlock {
        /// The gossiped block.
        block: Block,
        /// The peer that sent it.
        peer_id: PeerId,
    },
    /// A peer announced new block hashes.
    NewBlockHashes {
        /// The announcements, in gossip order.
        announcements: Vec<BlockHashAnnouncement>,
        /// The announcing peer.
        peer_id: PeerId,
    },
}

impl TipEvent {
    /// Short name of the event kind, for logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NewMilestone(_) => "new_milestone",
            Self::NewBlock { .. } => "new_block",
            Self::NewBlockHashes { .. } => "new_block_hashes",
        }
    }
}

/// Producer half of the tip event channel.
///
/// Sends never block the producer: gossip and milestone notifications
/// are re-announced by the network, so when the channel is full the
/// event is dropped and counted instead of applying back-pressure to
/// the networking stack.
#[derive(Debug, Clone)]
pub struct TipEventSender {
    tx: mpsc::Sender<TipEvent>,
}

impl TipEventSender {
    /// Enqueues an event, dropping it if the channel is full or the
    /// driver is gone.
    pub fn send(&self, event: TipEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                metrics::counter!(Metrics::TIP_EVENTS_DROPPED).increment(1);
                warn!(target: "sync", kind = event.kind(), "tip event channel full, dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                debug!(target: "sync", kind = event.kind(), "tip event channel closed, dropping event");
            }
        }
    }
}

/// Creates a bounded tip event channel with the given capacity.
pub fn tip_event_channel(capacity: usize) -> (TipEventSender, mpsc::Receiver<TipEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (TipEventSender { tx }, rx)
}
