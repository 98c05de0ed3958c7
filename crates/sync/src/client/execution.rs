//! Execution engine client.

use crate::error::ClientError;
use alloy_consensus::{Header, Sealed};
use async_trait::async_trait;
use sabal_chain::Block;
use std::fmt::Debug;

/// Client used to apply blocks to the execution engine and steer its
/// fork-choice.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExecutionClient: Debug + Send + Sync {
    /// Returns the header the execution engine currently considers the
    /// chain head.
    async fn current_header(&self) -> Result<Sealed<Header>, ClientError>;

    /// Hands a batch of blocks to the execution engine for insertion.
    async fn insert_blocks(&self, blocks: Vec<Block>) -> Result<(), ClientError>;

    /// Moves the execution engine's fork-choice pointer to `head` and
    /// marks `finalized` as the irreversible ancestor.
    async fn update_fork_choice(
        &self,
        head: Sealed<Header>,
        finalized: Sealed<Header>,
    ) -> Result<(), ClientError>;
}
