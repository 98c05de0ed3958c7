//! Error types surfaced by the sync driver.

use crate::client::P2pError;
use sabal_chain::ChainBuilderError;
use thiserror::Error;

/// Failure reported by a node collaborator that the sync core cannot
/// recover from on its own.
///
/// These services are shared with other node subsystems; their failure
/// semantics are not recoverable without higher-level orchestration, so
/// the driver surfaces them and stops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The execution engine failed or rejected a request.
    #[error("execution client error: {0}")]
    Execution(String),
    /// The attestation service client failed a synchronization request.
    #[error("attestation client error: {0}")]
    Attestation(String),
    /// The block downloader failed.
    #[error("block downloader error: {0}")]
    Downloader(String),
    /// The bridge client failed a synchronization request.
    #[error("bridge client error: {0}")]
    Bridge(String),
    /// The store failed to flush.
    #[error("store error: {0}")]
    Store(String),
}

/// Errors surfaced by [`crate::SyncDriver::run`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// A collaborator failed fatally.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// A peer fetch failed with an error the driver does not tolerate.
    #[error(transparent)]
    P2p(#[from] P2pError),
    /// The chain builder rejected an operation that must succeed.
    #[error(transparent)]
    ChainBuilder(#[from] ChainBuilderError),
    /// A milestone event was received but the milestone download found
    /// no headers past the last finalized block, which violates the
    /// attestation protocol.
    #[error("no milestone headers available after a new milestone event")]
    MilestoneVoidAfterEvent,
    /// The tip event channel was closed by its producers.
    #[error("tip event channel closed")]
    EventChannelClosed,
    /// The driver was cancelled.
    #[error("sync driver cancelled")]
    Cancelled,
}
