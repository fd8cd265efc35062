//! The registry hub: the one object the RPC layer talks to.
//!
//! Orchestrates the store, the observer index, the save coalescer and the
//! push pipeline. Every mutation updates the store first, then raises the
//! save signal, then enqueues the push event — so an observer that
//! receives a push is guaranteed that a subsequent read reflects the
//! mutation.
//!
//! [`RegHub::start`] spawns the two long-lived workers (push notifier and
//! snapshot saver); [`RegHub::stop`] closes the coalescer and both push
//! queues and waits for the workers to drain and exit. Mutations racing a
//! shutdown observe a closed queue, drop their event and succeed.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use reghub_proto::srv_key;
use reghub_proto::srv_type_key;
use reghub_proto::ConnChange;
use reghub_proto::ConnChangePush;
use reghub_proto::DataOp;
use reghub_proto::DataOpPush;
use reghub_proto::KeyType;
use reghub_proto::SnapshotFile;
use reghub_proto::SrvRecord;
use reghub_proto::MAX_PUSH_QUEUE;

use crate::notifier::PushNotifier;
use crate::Observer;
use crate::ObserverIndex;
use crate::Pusher;
use crate::RegStore;
use crate::Result;
use crate::SaveSignal;

#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Snapshot file rewritten by the saver on every dirty signal.
    pub save_path: PathBuf,

    /// Log the full registry dump (temp records included) after each save.
    pub debug_dump: bool,

    /// Capacity of each push queue; producers block when full.
    pub push_queue_capacity: usize,
}

impl HubConfig {
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
            debug_dump: false,
            push_queue_capacity: MAX_PUSH_QUEUE,
        }
    }
}

pub struct RegHub {
    store: Arc<RwLock<RegStore>>,
    observers: Arc<ObserverIndex>,
    save_signal: Arc<SaveSignal>,
    pusher: Arc<dyn Pusher>,
    config: HubConfig,

    // Senders are taken on stop() so that producers observe closed queues.
    data_op_tx: RwLock<Option<mpsc::Sender<DataOpPush>>>,
    conn_change_tx: RwLock<Option<mpsc::Sender<ConnChangePush>>>,

    // Receivers parked here between new() and start().
    pending_rx: Mutex<Option<(mpsc::Receiver<DataOpPush>, mpsc::Receiver<ConnChangePush>)>>,

    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl RegHub {
    pub fn new(
        config: HubConfig,
        pusher: Arc<dyn Pusher>,
    ) -> Self {
        let (data_op_tx, data_op_rx) = mpsc::channel(config.push_queue_capacity);
        let (conn_change_tx, conn_change_rx) = mpsc::channel(config.push_queue_capacity);

        Self {
            store: Arc::new(RwLock::new(RegStore::new())),
            observers: Arc::new(ObserverIndex::new()),
            save_signal: Arc::new(SaveSignal::new()),
            pusher,
            config,
            data_op_tx: RwLock::new(Some(data_op_tx)),
            conn_change_tx: RwLock::new(Some(conn_change_tx)),
            pending_rx: Mutex::new(Some((data_op_rx, conn_change_rx))),
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Spawns the push notifier and the snapshot saver. Idempotent; a
    /// second call is a logged no-op.
    pub fn start(&self) {
        let Some((data_op_rx, conn_change_rx)) = self.pending_rx.lock().take() else {
            warn!("hub already started");
            return;
        };

        let notifier = PushNotifier::new(
            data_op_rx,
            conn_change_rx,
            self.observers.clone(),
            self.pusher.clone(),
        );

        let mut workers = self.workers.lock();
        workers.push(tokio::spawn(notifier.run()));
        workers.push(tokio::spawn(Self::run_saver(
            self.store.clone(),
            self.save_signal.clone(),
            self.config.save_path.clone(),
            self.config.debug_dump,
        )));

        info!(save_path = %self.config.save_path.display(), "registry hub started");
    }

    /// Graceful shutdown: closes the save coalescer and both push queues,
    /// then waits for the workers to drain and exit.
    pub async fn stop(&self) {
        self.save_signal.close();
        *self.data_op_tx.write() = None;
        *self.conn_change_tx.write() = None;

        let workers = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            if let Err(e) = worker.await {
                error!("worker join failed: {e}");
            }
        }

        info!("registry hub stopped");
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Registers a service or replaces the payload of an existing one.
    pub async fn update_srv(
        &self,
        srv_type: u32,
        srv_no: u32,
        is_temp: bool,
        payload_b64: impl Into<String>,
    ) {
        let result = {
            let mut store = self.store.write();
            if store.has_srv(srv_type, srv_no) {
                store.set_srv_payload(srv_type, srv_no, payload_b64)
            } else {
                store.add_srv(srv_type, srv_no, is_temp, payload_b64)
            }
        };

        if let Err(e) = result {
            warn!(srv_type, srv_no, "update_srv failed: {e}");
            return;
        }

        self.save_signal.signal();
        self.enqueue_data_op(DataOpPush::new(
            KeyType::SrvInfo,
            srv_key(srv_type, srv_no),
            DataOp::Update,
        ))
        .await;
    }

    pub async fn remove_srv(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) {
        let removed = {
            let mut store = self.store.write();
            if store.has_srv(srv_type, srv_no) {
                store.remove_srv(srv_type, srv_no);
                true
            } else {
                false
            }
        };

        if !removed {
            return;
        }

        self.save_signal.signal();
        self.enqueue_data_op(DataOpPush::new(
            KeyType::SrvInfo,
            srv_key(srv_type, srv_no),
            DataOp::Remove,
        ))
        .await;
    }

    pub async fn update_global_data(
        &self,
        key: &str,
        payload_b64: impl Into<String>,
    ) {
        if let Err(e) = self.store.write().set_global(key, payload_b64) {
            warn!(key, "update_global_data failed: {e}");
            return;
        }

        self.save_signal.signal();
        self.enqueue_data_op(DataOpPush::new(KeyType::GlobalData, key, DataOp::Update))
            .await;
    }

    pub async fn remove_global_data(
        &self,
        key: &str,
    ) {
        let removed = {
            let mut store = self.store.write();
            if store.has_global(key) {
                store.remove_global(key);
                true
            } else {
                false
            }
        };

        if !removed {
            return;
        }

        self.save_signal.signal();
        self.enqueue_data_op(DataOpPush::new(KeyType::GlobalData, key, DataOp::Remove))
            .await;
    }

    /// Called by the connection-liveness collaborator, not by RPC.
    pub async fn notify_conn_change(
        &self,
        srv_type: u32,
        srv_no: u32,
        change: ConnChange,
    ) {
        let event = ConnChangePush::new(srv_type, srv_no, change);

        let tx = self.conn_change_tx.read().clone();
        match tx {
            Some(tx) => {
                if tx.send(event).await.is_err() {
                    debug!("conn-change queue closed; dropping event on shutdown");
                }
            }
            None => debug!("conn-change queue closed; dropping event on shutdown"),
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn get_srv(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) -> Option<SrvRecord> {
        self.store.read().get_srv_info(srv_type, srv_no)
    }

    pub fn get_srv_by_key(
        &self,
        key: &str,
    ) -> Option<SrvRecord> {
        self.store.read().get_srv_info_by_key(key)
    }

    pub fn get_srvs_by_type(
        &self,
        srv_type: u32,
    ) -> Option<Vec<SrvRecord>> {
        self.store.read().get_all_srv_infos(srv_type)
    }

    pub fn get_all_srv_nos(
        &self,
        srv_type: u32,
    ) -> Option<Vec<u32>> {
        self.store.read().get_all_srv_nos(srv_type)
    }

    pub fn has_srv(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) -> bool {
        self.store.read().has_srv(srv_type, srv_no)
    }

    pub fn is_temp_srv(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) -> Result<bool> {
        self.store.read().is_temp_srv(srv_type, srv_no)
    }

    pub fn get_global_data(
        &self,
        key: &str,
    ) -> Option<String> {
        self.store.read().get_global(key)
    }

    pub fn has_global_data(
        &self,
        key: &str,
    ) -> bool {
        self.store.read().has_global(key)
    }

    /// Full state including temp records, for debug inspection.
    pub fn dump(&self) -> SnapshotFile {
        self.store.read().dump()
    }

    // ------------------------------------------------------------------
    // Watch / unwatch
    // ------------------------------------------------------------------

    pub fn watch_srv(
        &self,
        src: Observer,
        srv_type: u32,
        srv_no: u32,
    ) {
        self.observers.add_keyed(&srv_key(srv_type, srv_no), src);
    }

    pub fn stop_watch_srv(
        &self,
        src: Observer,
        srv_type: u32,
        srv_no: u32,
    ) {
        self.observers.remove_keyed(&srv_key(srv_type, srv_no), src);
    }

    /// Parent-key subscription: one watch covering every record of a type.
    pub fn watch_srvs_by_type(
        &self,
        src: Observer,
        srv_type: u32,
    ) {
        self.observers.add_keyed(&srv_type_key(srv_type), src);
    }

    pub fn stop_watch_srvs_by_type(
        &self,
        src: Observer,
        srv_type: u32,
    ) {
        self.observers.remove_keyed(&srv_type_key(srv_type), src);
    }

    pub fn watch_global_data(
        &self,
        src: Observer,
        key: &str,
    ) {
        self.observers.add_keyed(key, src);
    }

    pub fn stop_watch_global_data(
        &self,
        src: Observer,
        key: &str,
    ) {
        self.observers.remove_keyed(key, src);
    }

    pub fn watch_conn(
        &self,
        src: Observer,
    ) {
        self.observers.add_conn(src);
    }

    pub fn stop_watch_conn(
        &self,
        src: Observer,
    ) {
        self.observers.remove_conn(src);
    }

    /// Drops every subscription held by `observer`, keyed and connection.
    pub fn stop_all_watch(
        &self,
        observer: Observer,
    ) {
        self.observers.remove_keyed_all(observer);
        self.observers.remove_conn(observer);
    }

    // ------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------

    /// Merges the snapshot file at the configured path into the store.
    pub fn load_snapshot(&self) -> Result<()> {
        self.store.write().load(&self.config.save_path)
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    // ------------------------------------------------------------------

    async fn enqueue_data_op(
        &self,
        event: DataOpPush,
    ) {
        let tx = self.data_op_tx.read().clone();
        match tx {
            Some(tx) => {
                if tx.send(event).await.is_err() {
                    debug!("data-op queue closed; dropping event on shutdown");
                }
            }
            None => debug!("data-op queue closed; dropping event on shutdown"),
        }
    }

    async fn run_saver(
        store: Arc<RwLock<RegStore>>,
        signal: Arc<SaveSignal>,
        save_path: PathBuf,
        debug_dump: bool,
    ) {
        debug!("snapshot saver started");

        while signal.wait().await.is_ok() {
            if let Err(e) = store.read().save(&save_path) {
                error!(save_path = %save_path.display(), "snapshot save failed: {e}");
            }

            if debug_dump {
                match serde_json::to_string(&store.read().dump()) {
                    Ok(json) => debug!(%json, "registry dump"),
                    Err(e) => error!("registry dump encode failed: {e}"),
                }
            }
        }

        debug!("snapshot saver stopped");
    }
}
