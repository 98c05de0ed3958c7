//! Block payload types.

use alloy_consensus::{Header, Sealed, TxEnvelope};
use alloy_primitives::B256;

/// Body of a [`Block`], carrying ethereum-style transaction envelopes.
pub type BlockBody = alloy_consensus::BlockBody<TxEnvelope>;

/// A block as exchanged with peers and the execution engine.
///
/// The sync core interprets only the header; the body is carried as an
/// opaque payload for the execution engine, apart from the structural
/// checks in [`crate::verify_blocks`].
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The sealed block header.
    pub header: Sealed<Header>,
    /// The block body.
    pub body: BlockBody,
}

impl Block {
    /// Creates a new block from a sealed header and its body.
    pub const fn new(header: Sealed<Header>, body: BlockBody) -> Self {
        Self { header, body }
    }

    /// Returns the block hash.
    pub fn hash(&self) -> B256 {
        self.header.hash()
    }

    /// Returns the block number.
    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// Returns the hash of the parent block.
    pub fn parent_hash(&self) -> B256 {
        self.header.parent_hash
    }
}
