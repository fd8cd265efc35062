//! Shared fixture: a running registry node wired to a recording pusher
//! and a throwaway snapshot directory.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::timeout;

use reghub::NodeBuilder;
use reghub::NodeSettings;
use reghub::RegNode;
use reghub_core::test_utils::PushRecord;
use reghub_core::test_utils::RecordingPusher;
use reghub_core::RegStore;

pub struct TestNode {
    pub node: RegNode,
    pub pushed_rx: mpsc::UnboundedReceiver<PushRecord>,
    pub save_path: PathBuf,
    pub dir: TempDir,
}

pub fn start_node() -> TestNode {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    start_node_in(dir)
}

/// Best-effort subscriber init; later calls are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Starts a node against an existing directory, so tests can restart a
/// node over the same snapshot file.
pub fn start_node_in(dir: TempDir) -> TestNode {
    let save_path = dir.path().join("reg_info.json");
    let settings = NodeSettings {
        save_path: save_path.clone(),
        ..NodeSettings::default()
    };

    let (pusher, pushed_rx) = RecordingPusher::channel();
    let node = NodeBuilder::new(settings, pusher).build();

    TestNode {
        node,
        pushed_rx,
        save_path,
        dir,
    }
}

pub async fn recv_push(test_node: &mut TestNode) -> PushRecord {
    timeout(Duration::from_millis(300), test_node.pushed_rx.recv())
        .await
        .expect("push within deadline")
        .expect("push channel open")
}

pub async fn assert_no_push(test_node: &mut TestNode) {
    let extra = timeout(Duration::from_millis(80), test_node.pushed_rx.recv()).await;
    assert!(extra.is_err(), "unexpected push: {extra:?}");
}

/// Polls until the snapshot file satisfies `predicate` (the saver runs
/// asynchronously behind the coalescer).
pub async fn wait_for_snapshot<F>(
    path: &Path,
    mut predicate: F,
) -> RegStore
where
    F: FnMut(&RegStore) -> bool,
{
    for _ in 0..100 {
        let mut store = RegStore::new();
        if store.load(path).is_ok() && predicate(&store) {
            return store;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("snapshot at {} never reached the expected state", path.display());
}
