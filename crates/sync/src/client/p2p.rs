//! Peer-to-peer service client.

use alloy_primitives::B256;
use async_trait::async_trait;
use derive_more::Display;
use sabal_chain::Block;
use std::fmt::Debug;
use thiserror::Error;

/// Identifier of a peer on the block gossip network.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display("{_0}")]
pub struct PeerId(pub B256);

/// Errors returned by the peer-to-peer service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum P2pError {
    /// The peer replied with fewer headers than requested.
    #[error("peer {peer_id} returned an incomplete header range starting at {start}")]
    IncompleteHeaders {
        /// The responding peer.
        peer_id: PeerId,
        /// First block number of the requested range.
        start: u64,
    },
    /// The peer replied with headers but not all matching bodies.
    #[error("peer {peer_id} is missing bodies for the range starting at {start}")]
    MissingBodies {
        /// The responding peer.
        peer_id: PeerId,
        /// First block number of the requested range.
        start: u64,
    },
    /// Transport or protocol failure talking to the network.
    #[error("p2p error: {0}")]
    Internal(String),
}

impl P2pError {
    /// Whether the error is an incomplete response that the live driver
    /// tolerates without penalizing the peer, since the peer may simply
    /// lack the requested history.
    pub const fn is_incomplete_response(&self) -> bool {
        matches!(self, Self::IncompleteHeaders { .. } | Self::MissingBodies { .. })
    }
}

/// Client used to fetch blocks from and penalize gossip peers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait P2pClient: Debug + Send + Sync {
    /// Fetches the blocks in `[start, end_exclusive)` from `peer_id`.
    async fn fetch_blocks(
        &self,
        start: u64,
        end_exclusive: u64,
        peer_id: PeerId,
    ) -> Result<Vec<Block>, P2pError>;

    /// Penalizes a peer for delivering an invalid batch.
    async fn penalize(&self, peer_id: PeerId) -> Result<(), P2pError>;
}
