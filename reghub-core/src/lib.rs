//! # reghub-core
//!
//! The registry core: a hierarchical keyed store with watch/notify fan-out
//! for a fleet of peer services.
//!
//! ## Architecture
//!
//! ```text
//! RPC dispatch ──► RegHub (facade)
//!                   │  mutation: store write ─► SaveSignal ─► push queue
//!                   │  query:    store read
//!                   │  watch:    ObserverIndex
//!                   ▼
//!        ┌──────────┴──────────┐
//!        ▼                     ▼
//!   PushNotifier          snapshot saver
//!   (bounded queues,      (coalesced rewrite of
//!    clone-then-push)      the snapshot file)
//!        │
//!        ▼
//!      Pusher (transport seam)
//! ```
//!
//! Two long-lived workers are spawned by [`RegHub::start`]: the notifier
//! drains the two bounded push queues and serialises delivery through the
//! [`Pusher`] trait; the saver blocks on the [`SaveSignal`] and rewrites
//! the snapshot once per quiet period, however many mutations arrived.
//!
//! Networking, codecs and connection liveness live outside this crate;
//! the core only sees decoded records and emits framed pushes.

mod errors;
mod hub;
mod notifier;
mod observer;
mod path_tree;
mod pusher;
mod save_signal;
mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod notifier_test;

pub use errors::Error;
pub use errors::PushError;
pub use errors::RegistryError;
pub use errors::Result;
pub use errors::SignalError;
pub use errors::StorageError;
pub use hub::HubConfig;
pub use hub::RegHub;
pub use observer::Observer;
pub use observer::ObserverIndex;
pub use path_tree::PathTree;
pub use pusher::Pusher;
pub use save_signal::SaveSignal;
pub use store::RegStore;

#[cfg(test)]
pub(crate) use pusher::MockPusher;
