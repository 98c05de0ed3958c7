//! Cross-chain event bridge client.

use crate::error::ClientError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Client for the bridge that relays cross-chain events keyed by block
/// number.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BridgeClient: Debug + Send + Sync {
    /// Ensures the cross-chain event snapshot covers `block_num`.
    async fn synchronize(&self, block_num: u64) -> Result<(), ClientError>;
}
