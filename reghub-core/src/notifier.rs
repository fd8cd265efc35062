//! Push pipeline consumer: the single notifier worker.
//!
//! Drains the two bounded event queues and serialises delivery to the
//! [`Pusher`]. For a data-op event the clone of the exact key's observer
//! list is pushed first, then the clone of the parent key's list (watching
//! `"/7"` therefore covers every `"/7/n"` record). Connection changes fan
//! out to the connection observer set.
//!
//! Delivery failures never stop the loop; the worker exits when either
//! queue closes.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::debug;
use tracing::error;
use tracing::warn;

use reghub_proto::parent_key;
use reghub_proto::ConnChangePush;
use reghub_proto::DataOpPush;
use reghub_proto::PackHeader;
use reghub_proto::PushEvent;
use reghub_proto::PUSH_MARK;

use crate::Observer;
use crate::ObserverIndex;
use crate::Pusher;

pub(crate) struct PushNotifier {
    data_op_rx: mpsc::Receiver<DataOpPush>,
    conn_change_rx: mpsc::Receiver<ConnChangePush>,
    observers: Arc<ObserverIndex>,
    pusher: Arc<dyn Pusher>,
}

impl PushNotifier {
    pub(crate) fn new(
        data_op_rx: mpsc::Receiver<DataOpPush>,
        conn_change_rx: mpsc::Receiver<ConnChangePush>,
        observers: Arc<ObserverIndex>,
        pusher: Arc<dyn Pusher>,
    ) -> Self {
        Self {
            data_op_rx,
            conn_change_rx,
            observers,
            pusher,
        }
    }

    pub(crate) async fn run(mut self) {
        debug!("push notifier started");

        loop {
            tokio::select! {
                event = self.data_op_rx.recv() => {
                    match event {
                        Some(event) => self.notify_data_op(event).await,
                        None => break,
                    }
                }

                event = self.conn_change_rx.recv() => {
                    match event {
                        Some(event) => self.notify_conn_change(event).await,
                        None => break,
                    }
                }
            }
        }

        debug!("push notifier stopped");
    }

    async fn notify_data_op(
        &self,
        event: DataOpPush,
    ) {
        let exact = self.observers.clone_keyed(&event.key);
        let parent = parent_key(&event.key).and_then(|key| self.observers.clone_keyed(key));

        let event = PushEvent::DataOp(event);
        if let Some(list) = exact {
            self.push_to(&list, &event).await;
        }
        if let Some(list) = parent {
            self.push_to(&list, &event).await;
        }
    }

    async fn notify_conn_change(
        &self,
        event: ConnChangePush,
    ) {
        let list = self.observers.clone_conn();
        self.push_to(&list, &PushEvent::ConnChange(event)).await;
    }

    async fn push_to(
        &self,
        list: &[Observer],
        event: &PushEvent,
    ) {
        if list.is_empty() {
            return;
        }

        let body = match event.encode_body() {
            Ok(body) => Bytes::from(body),
            Err(e) => {
                error!(?event, "push body encode failed: {e}");
                return;
            }
        };
        let header = PackHeader::new(PUSH_MARK, 0, event.func_no()).encode();

        for observer in list {
            if let Err(e) = self
                .pusher
                .push(
                    observer.srv_type,
                    observer.srv_no,
                    header.clone(),
                    body.clone(),
                )
                .await
            {
                warn!(
                    dst_type = observer.srv_type,
                    dst_no = observer.srv_no,
                    "push failed: {e}"
                );
            }
        }
    }
}
