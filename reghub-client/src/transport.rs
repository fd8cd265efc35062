//! RPC transport seam on the client side.

use async_trait::async_trait;

use reghub_proto::MethodCall;
use reghub_proto::MethodReply;

use crate::ClientApiError;

/// Carries one decoded method call to the registry and returns the
/// decoded reply. Encoding, framing and connection management belong to
/// the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallTransport: Send + Sync {
    async fn call(
        &self,
        call: MethodCall,
    ) -> Result<MethodReply, ClientApiError>;
}
