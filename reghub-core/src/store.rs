//! Registry state: service records and global data, with snapshot
//! persistence.
//!
//! The store is purely synchronous; the facade sequences access through a
//! single process-wide reader/writer lock. Snapshot `load` merges into the
//! current state rather than replacing it, and `save` omits temporary
//! records while `dump` keeps them.

use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use reghub_proto::srv_key;
use reghub_proto::srv_type_key;
use reghub_proto::SnapshotFile;
use reghub_proto::SrvRecord;

use crate::PathTree;
use crate::RegistryError;
use crate::Result;
use crate::StorageError;

#[derive(Debug, Default)]
pub struct RegStore {
    srv_tree: PathTree<SrvRecord>,
    global_tree: PathTree<String>,
}

impl RegStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Service records
    // ------------------------------------------------------------------

    pub fn add_srv(
        &mut self,
        srv_type: u32,
        srv_no: u32,
        is_temp: bool,
        payload_b64: impl Into<String>,
    ) -> Result<()> {
        let record = SrvRecord::new(srv_type, srv_no, is_temp, payload_b64);
        self.srv_tree
            .set(&srv_key(srv_type, srv_no), record)
            .map_err(Into::into)
    }

    /// Replaces the payload of an existing record.
    pub fn set_srv_payload(
        &mut self,
        srv_type: u32,
        srv_no: u32,
        payload_b64: impl Into<String>,
    ) -> Result<()> {
        match self.srv_tree.get_mut(&srv_key(srv_type, srv_no)) {
            Some(record) => {
                record.payload_b64 = payload_b64.into();
                Ok(())
            }
            None => Err(RegistryError::SrvNotExists.into()),
        }
    }

    pub fn remove_srv(
        &mut self,
        srv_type: u32,
        srv_no: u32,
    ) {
        self.srv_tree.remove(&srv_key(srv_type, srv_no));
    }

    pub fn has_srv(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) -> bool {
        self.srv_tree.get(&srv_key(srv_type, srv_no)).is_some()
    }

    pub fn is_temp_srv(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) -> Result<bool> {
        self.srv_tree
            .get(&srv_key(srv_type, srv_no))
            .map(|record| record.is_temp)
            .ok_or_else(|| RegistryError::SrvNotExists.into())
    }

    pub fn get_srv_info(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) -> Option<SrvRecord> {
        self.srv_tree.get(&srv_key(srv_type, srv_no)).cloned()
    }

    pub fn get_srv_payload(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) -> Option<String> {
        self.srv_tree
            .get(&srv_key(srv_type, srv_no))
            .map(|record| record.payload_b64.clone())
    }

    /// Looks a record up by raw key, e.g. `"/7/42"`.
    pub fn get_srv_info_by_key(
        &self,
        key: &str,
    ) -> Option<SrvRecord> {
        self.srv_tree.get(key).cloned()
    }

    /// Numbers of every live record of `srv_type`. `None` when the type
    /// node itself does not exist; unparseable child segments are skipped.
    pub fn get_all_srv_nos(
        &self,
        srv_type: u32,
    ) -> Option<Vec<u32>> {
        self.srv_tree
            .child_keys(&srv_type_key(srv_type))
            .map(|keys| {
                keys.iter()
                    .filter_map(|segment| segment.parse::<u32>().ok())
                    .collect()
            })
    }

    pub fn get_all_srv_infos(
        &self,
        srv_type: u32,
    ) -> Option<Vec<SrvRecord>> {
        self.srv_tree
            .child_data(&srv_type_key(srv_type))
            .map(|records| records.into_iter().cloned().collect())
    }

    // ------------------------------------------------------------------
    // Global data
    // ------------------------------------------------------------------

    pub fn set_global(
        &mut self,
        key: &str,
        payload_b64: impl Into<String>,
    ) -> Result<()> {
        self.global_tree
            .set(key, payload_b64.into())
            .map_err(Into::into)
    }

    pub fn has_global(
        &self,
        key: &str,
    ) -> bool {
        self.global_tree.get(key).is_some()
    }

    pub fn get_global(
        &self,
        key: &str,
    ) -> Option<String> {
        self.global_tree.get(key).cloned()
    }

    pub fn remove_global(
        &mut self,
        key: &str,
    ) {
        self.global_tree.remove(key);
    }

    // ------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------

    /// Merges a snapshot file into the current state. Existing entries are
    /// kept unless the file overwrites them; missing sections are fine.
    pub fn load(
        &mut self,
        path: &Path,
    ) -> Result<()> {
        let file = File::open(path).map_err(|source| StorageError::PathError {
            path: path.to_path_buf(),
            source,
        })?;

        let snapshot: SnapshotFile = serde_json::from_reader(BufReader::new(file))?;

        for record in snapshot.srv {
            self.add_srv(
                record.srv_type,
                record.srv_no,
                record.is_temp,
                record.payload_b64,
            )?;
        }

        for (key, value) in snapshot.global {
            self.set_global(&key, value)?;
        }

        Ok(())
    }

    /// Rewrites the snapshot file from scratch, skipping temp records.
    pub fn save(
        &self,
        path: &Path,
    ) -> Result<()> {
        let snapshot = self.snapshot(false);

        let file = File::create(path).map_err(|source| StorageError::PathError {
            path: path.to_path_buf(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &snapshot)?;
        writer.flush()?;
        Ok(())
    }

    /// Full in-memory state, temp records included.
    pub fn dump(&self) -> SnapshotFile {
        self.snapshot(true)
    }

    fn snapshot(
        &self,
        include_temp: bool,
    ) -> SnapshotFile {
        let mut snapshot = SnapshotFile::default();

        self.srv_tree.walk(|_, record| {
            if include_temp || !record.is_temp {
                snapshot.srv.push(record.clone());
            }
        });

        self.global_tree.walk(|key, value| {
            snapshot.global.insert(key.to_string(), value.clone());
        });

        snapshot
    }
}
