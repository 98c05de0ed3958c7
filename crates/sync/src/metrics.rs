//! Metrics for the sync core.

/// Container for the metric identifiers recorded by the sync core.
#[derive(Debug, Clone, Copy)]
pub struct Metrics;

impl Metrics {
    /// Identifier for the gauge that tracks the block number of the
    /// current chain tip.
    pub const TIP_BLOCK_HEIGHT: &'static str = "sabal_node_tip_block_height";

    /// Identifier for the gauge that tracks the block number of the
    /// last finalized header.
    pub const FINALIZED_BLOCK_HEIGHT: &'static str = "sabal_node_finalized_block_height";

    /// Identifier for the counter of tip events dropped on channel
    /// overflow.
    pub const TIP_EVENTS_DROPPED: &'static str = "sabal_node_tip_events_dropped";

    /// Identifier for the counter of peer penalizations issued by the
    /// live driver.
    pub const PEER_PENALIZATIONS: &'static str = "sabal_node_peer_penalizations";

    /// Identifier for the counter of milestone mismatches that forced
    /// an unwind to the last finalized header.
    pub const MILESTONE_MISMATCHES: &'static str = "sabal_node_milestone_mismatches";
}
