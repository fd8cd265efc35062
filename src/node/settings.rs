use std::path::PathBuf;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::Result;
use reghub_core::HubConfig;
use reghub_proto::MAX_PUSH_QUEUE;

/// Registry node settings.
///
/// Loaded from an optional config file with `REGHUB_`-prefixed
/// environment overrides; every field has a default so a bare node runs
/// with no configuration at all.
#[derive(Debug, Deserialize, Clone)]
pub struct NodeSettings {
    /// Snapshot file path.
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,

    /// Log the full registry dump after each snapshot write.
    #[serde(default)]
    pub debug_dump: bool,

    /// Capacity of each push queue.
    #[serde(default = "default_push_queue_capacity")]
    pub push_queue_capacity: usize,
}

fn default_save_path() -> PathBuf {
    PathBuf::from("reg_info.json")
}

fn default_push_queue_capacity() -> usize {
    MAX_PUSH_QUEUE
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
            debug_dump: false,
            push_queue_capacity: default_push_queue_capacity(),
        }
    }
}

impl NodeSettings {
    pub fn load(config_file: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path));
        }

        let config = builder
            .add_source(Environment::with_prefix("REGHUB"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub(crate) fn hub_config(&self) -> HubConfig {
        HubConfig {
            save_path: self.save_path.clone(),
            debug_dump: self.debug_dump,
            push_queue_capacity: self.push_queue_capacity,
        }
    }
}
