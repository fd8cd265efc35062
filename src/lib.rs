//! # reghub — Service Registry & Watch/Notify Hub
//!
//! A registry for a fleet of peer services: peers register typed endpoints
//! with opaque payloads, query each other, share small pieces of global
//! state under hierarchical keys, and subscribe to change notifications.
//! Mutations coalesce into snapshot writes; watchers receive asynchronous
//! push frames through a pluggable transport.
//!
//! ## Crate Organization
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | **`reghub`** | Node assembly + RPC dispatch service (this crate) |
//! | `reghub-core` | Registry core: store, watch index, push pipeline |
//! | `reghub-client` | Client library: RPC wrappers + push consumer |
//! | `reghub-proto` | Wire-shared types and constants |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use reghub::{NodeBuilder, NodeSettings};
//!
//! let settings = NodeSettings::load(Some("reghub.toml"))?;
//! let node = NodeBuilder::new(settings, Arc::new(MyPusher)).build();
//!
//! // The transport feeds decoded calls into the dispatch service:
//! let reply = node.service().handle(src, call).await;
//!
//! node.stop().await;
//! ```
//!
//! The transport layer (pack framing, codec, connection liveness) stays
//! outside: it drives [`RegService::handle`] with decoded
//! [`MethodCall`](reghub_proto::MethodCall)s, implements
//! [`Pusher`](reghub_core::Pusher) for outbound frames, and reports link
//! state via [`RegHub::notify_conn_change`](reghub_core::RegHub).

mod errors;
mod node;
mod service;

#[cfg(test)]
mod service_test;

pub use errors::Error;
pub use errors::Result;
pub use node::NodeBuilder;
pub use node::NodeSettings;
pub use node::RegNode;
pub use service::RegService;

pub use reghub_client::CallTransport;
pub use reghub_client::ClientApiError;
pub use reghub_client::PushObserver;
pub use reghub_client::PushSource;
pub use reghub_client::RegClient;
pub use reghub_core::HubConfig;
pub use reghub_core::Observer;
pub use reghub_core::Pusher;
pub use reghub_core::RegHub;

/// Convenient prelude for importing common types
pub mod prelude {
    pub use crate::NodeBuilder;
    pub use crate::NodeSettings;
    pub use crate::Observer;
    pub use crate::Pusher;
    pub use crate::RegClient;
    pub use crate::RegHub;
    pub use crate::RegNode;
    pub use crate::RegService;
}
