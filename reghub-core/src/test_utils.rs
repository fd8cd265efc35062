//! Shared test helpers: an in-memory pusher that records every frame it
//! is handed, for asserting on delivery without a real transport.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use reghub_proto::ConnChangePush;
use reghub_proto::DataOpPush;
use reghub_proto::PackHeader;
use reghub_proto::CONN_CHANGE_PUSH_FUNC_NO;
use reghub_proto::DATA_OPR_PUSH_FUNC_NO;

use crate::Pusher;
use crate::Result;

/// One captured push: destination plus raw frame parts.
#[derive(Debug, Clone)]
pub struct PushRecord {
    pub dst_type: u32,
    pub dst_no: u32,
    pub header: Bytes,
    pub body: Bytes,
}

impl PushRecord {
    pub fn pack_header(&self) -> PackHeader {
        PackHeader::decode(&mut self.header.clone()).expect("recorded header decodes")
    }

    /// The body decoded as a data-op push, when the func number matches.
    pub fn data_op(&self) -> Option<DataOpPush> {
        if self.pack_header().func_no != DATA_OPR_PUSH_FUNC_NO {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }

    /// The body decoded as a conn-change push, when the func number matches.
    pub fn conn_change(&self) -> Option<ConnChangePush> {
        if self.pack_header().func_no != CONN_CHANGE_PUSH_FUNC_NO {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }
}

/// Pusher that forwards every frame into an unbounded channel.
pub struct RecordingPusher {
    tx: mpsc::UnboundedSender<PushRecord>,
}

impl RecordingPusher {
    /// Builds the pusher together with the receiving end for assertions.
    pub fn channel() -> (Arc<Self>, mpsc::UnboundedReceiver<PushRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

#[async_trait]
impl Pusher for RecordingPusher {
    async fn push(
        &self,
        dst_type: u32,
        dst_no: u32,
        header: Bytes,
        body: Bytes,
    ) -> Result<()> {
        // The receiver may be gone when a test only cares about state, not
        // deliveries; that is not a delivery failure.
        let _ = self.tx.send(PushRecord {
            dst_type,
            dst_no,
            header,
            body,
        });
        Ok(())
    }
}
