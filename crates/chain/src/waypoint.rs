//! Externally attested waypoints.

use alloy_primitives::B256;

/// An externally attested assertion that the contiguous block range
/// `[start_block, end_block]` of the canonical chain resolves to
/// `root_hash`.
///
/// Milestones are finalizing: once a milestone is accepted, the range
/// it covers is irreversible. Checkpoints are advisory and only bound
/// bulk download during catch-up; they do not finalize against reorgs.
/// The attested root of a finalizing waypoint is the hash of the
/// range's final header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waypoint {
    /// First block covered by the waypoint.
    pub start_block: u64,
    /// Last block covered by the waypoint, inclusive.
    pub end_block: u64,
    /// Attested root of the covered range.
    pub root_hash: B256,
}

impl Waypoint {
    /// Creates a new waypoint over `[start_block, end_block]`.
    pub const fn new(start_block: u64, end_block: u64, root_hash: B256) -> Self {
        Self { start_block, end_block, root_hash }
    }

    /// Number of blocks covered by the waypoint.
    pub const fn length(&self) -> u64 {
        self.end_block.saturating_sub(self.start_block) + 1
    }
}
