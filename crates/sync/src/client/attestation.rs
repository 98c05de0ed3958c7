//! Attestation service client.

use crate::error::ClientError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Client for the external consensus service that attests checkpoints,
/// milestones and validator spans over the chain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttestationClient: Debug + Send + Sync {
    /// Brings the local checkpoint snapshot up to date.
    async fn synchronize_checkpoints(&self) -> Result<(), ClientError>;

    /// Brings the local milestone snapshot up to date.
    async fn synchronize_milestones(&self) -> Result<(), ClientError>;

    /// Ensures the validator-span snapshot covers `block_num`.
    async fn synchronize_spans(&self, block_num: u64) -> Result<(), ClientError>;
}
