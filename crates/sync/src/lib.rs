//! # sabal-sync
//!
//! Chain synchronization core for the sabal node.
//!
//! ## Overview
//!
//! The core drives the local execution state from an arbitrary starting
//! header up to the network tip and keeps it there:
//!
//! - **Catch-up**: bulk download in two passes, first anchored by
//!   advisory checkpoints, then by finalizing milestones, with the
//!   commit barrier run after each jump.
//! - **Live**: an event loop over a [`sabal_chain::CanonicalChainBuilder`]
//!   rooted at the caught-up header, reconciling new milestone
//!   attestations (which may force unwinds) and gossiped blocks and
//!   block hashes (which may require peer-triggered backfill and peer
//!   penalization).
//!
//! All collaborators — the execution engine, the waypoint-anchored
//! block downloader, the attestation service, the bridge, the
//! peer-to-peer service and the store — are injected as traits, so the
//! driver can be exercised deterministically in tests.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

/// Client traits for the collaborators the sync core calls into.
mod client;
pub use client::{
    AttestationClient, BlockDownloader, BridgeClient, ExecutionClient, P2pClient, P2pError, PeerId,
    Store,
};

/// Sync core configuration.
mod config;
pub use config::SyncConfig;

/// The catch-up and live synchronization driver.
mod driver;
pub use driver::SyncDriver;

/// Error types surfaced by the driver.
mod error;
pub use error::{ClientError, SyncError};

/// Tip events and the bounded channel that carries them.
mod event;
pub use event::{BlockHashAnnouncement, TipEvent, TipEventSender, tip_event_channel};

/// Metric identifiers for the sync core.
mod metrics;
pub use metrics::Metrics;
