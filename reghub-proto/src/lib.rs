//! # reghub-proto
//!
//! Wire-shared types for the reghub service registry.
//!
//! The transport layer (request/response framing, codec) lives outside this
//! workspace; what crosses the boundary are the *decoded* shapes defined
//! here:
//!
//! - [`MethodCall`] / [`MethodReply`] — one variant per registry RPC method,
//!   handed to the core by a dispatcher and returned to the transport.
//! - Request/response structs with their exact wire field names pinned via
//!   serde renames (`resCode`, `bTemp`, ...).
//! - Push bodies ([`DataOpPush`], [`ConnChangePush`]) and the [`PackHeader`]
//!   that prefixes every outbound push frame.
//! - The snapshot file schema ([`SnapshotFile`]) shared by the store and by
//!   tooling that inspects registry dumps.
//!
//! Protocol constants (marks, func numbers, result codes) live in
//! [`constants`] and [`res_code`].

mod constants;
mod header;
mod keys;
mod messages;
mod push;


pub use constants::*;
pub use header::{FrameError, PackHeader};
pub use keys::{parent_key, split_path, srv_key, srv_type_and_no, srv_type_key};
pub use messages::*;
pub use push::{ConnChange, ConnChangePush, DataOp, DataOpPush, KeyType, PushEvent};
