use std::sync::Arc;

use tracing::info;
use tracing::warn;

use crate::NodeSettings;
use crate::RegService;
use reghub_core::Pusher;
use reghub_core::RegHub;

/// Builds a running registry node: hub + dispatch service + workers.
pub struct NodeBuilder {
    settings: NodeSettings,
    pusher: Arc<dyn Pusher>,
}

impl NodeBuilder {
    pub fn new(
        settings: NodeSettings,
        pusher: Arc<dyn Pusher>,
    ) -> Self {
        Self { settings, pusher }
    }

    /// Constructs the hub, merges the snapshot file (best effort: a
    /// missing file just means a first boot) and spawns the workers.
    pub fn build(self) -> RegNode {
        let hub = Arc::new(RegHub::new(self.settings.hub_config(), self.pusher));

        match hub.load_snapshot() {
            Ok(()) => info!(
                save_path = %self.settings.save_path.display(),
                "registry snapshot loaded"
            ),
            Err(e) => warn!(
                save_path = %self.settings.save_path.display(),
                "registry snapshot not loaded, starting empty: {e}"
            ),
        }

        hub.start();

        RegNode {
            service: RegService::new(hub.clone()),
            hub,
        }
    }
}

/// A running registry node.
pub struct RegNode {
    hub: Arc<RegHub>,
    service: RegService,
}

impl RegNode {
    pub fn hub(&self) -> &Arc<RegHub> {
        &self.hub
    }

    /// The dispatch service the RPC transport drives.
    pub fn service(&self) -> &RegService {
        &self.service
    }

    /// Graceful shutdown: stop accepting work, drain the workers.
    pub async fn stop(&self) {
        self.hub.stop().await;
    }
}
