//! Header and block metadata store.

use crate::error::ClientError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Store the sync core flushes before making a tip advance externally
/// visible.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Debug + Send + Sync {
    /// Durably persists any buffered header and block metadata.
    async fn flush(&self) -> Result<(), ClientError>;
}
