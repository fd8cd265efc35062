//! Outbound push transport seam.

use async_trait::async_trait;
use bytes::Bytes;

use crate::Result;

/// Delivers one framed push to a peer.
///
/// Implementations live in the transport layer; the notifier calls this
/// once per observer per event and treats failures as log-and-continue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Pusher: Send + Sync {
    async fn push(
        &self,
        dst_type: u32,
        dst_no: u32,
        header: Bytes,
        body: Bytes,
    ) -> Result<()>;
}
