//! Waypoint-anchored bulk block downloader.

use crate::error::ClientError;
use alloy_consensus::{Header, Sealed};
use async_trait::async_trait;
use std::fmt::Debug;

/// Downloads block ranges bounded by attested waypoints and returns the
/// resulting tip.
///
/// Both operations return `None` when no further waypoint is available
/// past `start_block_num`, which the catch-up loop interprets as
/// caught-up-for-this-pass.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockDownloader: Debug + Send + Sync {
    /// Downloads blocks starting at `start_block_num` up to the last
    /// known checkpoint.
    async fn download_blocks_using_checkpoints(
        &self,
        start_block_num: u64,
    ) -> Result<Option<Sealed<Header>>, ClientError>;

    /// Downloads blocks starting at `start_block_num` up to the last
    /// known milestone.
    async fn download_blocks_using_milestones(
        &self,
        start_block_num: u64,
    ) -> Result<Option<Sealed<Header>>, ClientError>;
}
