//! Client traits for the collaborators the sync core calls into.
//!
//! Each collaborator is specified only by the operations the core
//! needs; concrete implementations live with the node's networking,
//! attestation and execution subsystems. Every trait is automocked for
//! deterministic driver tests.

mod attestation;
pub use attestation::AttestationClient;

mod bridge;
pub use bridge::BridgeClient;

mod downloader;
pub use downloader::BlockDownloader;

mod execution;
pub use execution::ExecutionClient;

mod p2p;
pub use p2p::{P2pClient, P2pError, PeerId};

mod store;
pub use store::Store;

#[cfg(test)]
pub(crate) use {
    attestation::MockAttestationClient, bridge::MockBridgeClient, downloader::MockBlockDownloader,
    execution::MockExecutionClient, p2p::MockP2pClient, store::MockStore,
};
