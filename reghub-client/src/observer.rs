//! Push consumer: raw frames in, typed events out.
//!
//! The transport hands over whole push frames; the observer validates the
//! pack header, routes the JSON body by func number and exposes two typed
//! channels. Undecodable frames are logged and skipped so one bad frame
//! never wedges the stream.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::error;
use tracing::warn;

use reghub_proto::ConnChangePush;
use reghub_proto::DataOpPush;
use reghub_proto::PackHeader;
use reghub_proto::CONN_CHANGE_PUSH_FUNC_NO;
use reghub_proto::DATA_OPR_PUSH_FUNC_NO;
use reghub_proto::PUSH_MARK;

/// Source of raw push frames (one complete frame per call).
///
/// `None` means the connection closed; the read loop then shuts both
/// typed channels.
#[async_trait]
pub trait PushSource: Send {
    async fn next_frame(&mut self) -> Option<Bytes>;
}

#[async_trait]
impl PushSource for mpsc::Receiver<Bytes> {
    async fn next_frame(&mut self) -> Option<Bytes> {
        self.recv().await
    }
}

/// Consumer-facing sequence of decoded push packs.
pub struct PushObserver {
    data_op_rx: mpsc::UnboundedReceiver<DataOpPush>,
    conn_change_rx: mpsc::UnboundedReceiver<ConnChangePush>,
}

impl PushObserver {
    /// Spawns the frame-reading loop over `source`.
    pub fn start<S>(source: S) -> (Self, JoinHandle<()>)
    where
        S: PushSource + 'static,
    {
        let (data_op_tx, data_op_rx) = mpsc::unbounded_channel();
        let (conn_change_tx, conn_change_rx) = mpsc::unbounded_channel();

        let reader = tokio::spawn(read_frames(source, data_op_tx, conn_change_tx));

        (
            Self {
                data_op_rx,
                conn_change_rx,
            },
            reader,
        )
    }

    /// Next data-operation push; `None` once the source closed.
    pub async fn pop_data_op(&mut self) -> Option<DataOpPush> {
        self.data_op_rx.recv().await
    }

    /// Next connection-change push; `None` once the source closed.
    pub async fn pop_conn_change(&mut self) -> Option<ConnChangePush> {
        self.conn_change_rx.recv().await
    }
}

async fn read_frames<S>(
    mut source: S,
    data_op_tx: mpsc::UnboundedSender<DataOpPush>,
    conn_change_tx: mpsc::UnboundedSender<ConnChangePush>,
) where
    S: PushSource,
{
    while let Some(mut frame) = source.next_frame().await {
        let header = match PackHeader::decode_expect(&mut frame, PUSH_MARK) {
            Ok(header) => header,
            Err(e) => {
                warn!("push frame rejected: {e}");
                continue;
            }
        };

        match header.func_no {
            DATA_OPR_PUSH_FUNC_NO => match serde_json::from_slice::<DataOpPush>(&frame) {
                Ok(push) => {
                    let _ = data_op_tx.send(push);
                }
                Err(e) => error!("data-op push decode failed: {e}"),
            },
            CONN_CHANGE_PUSH_FUNC_NO => match serde_json::from_slice::<ConnChangePush>(&frame) {
                Ok(push) => {
                    let _ = conn_change_tx.send(push);
                }
                Err(e) => error!("conn-change push decode failed: {e}"),
            },
            other => warn!(func_no = other, "unknown push func number"),
        }
    }

    debug!("push source closed");
}
