//! Observer identities and the subscription index.
//!
//! Two sub-structures, each behind its own reader/writer lock: the keyed
//! index (key -> ordered observer list) and the connection-change set.
//! Push delivery only ever iterates clones taken under the read lock, so
//! no list is mutated while being walked.

use std::collections::HashMap;

use parking_lot::RwLock;

/// A peer identity that subscribed to pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Observer {
    pub srv_type: u32,
    pub srv_no: u32,
}

impl Observer {
    pub fn new(
        srv_type: u32,
        srv_no: u32,
    ) -> Self {
        Self { srv_type, srv_no }
    }
}

#[derive(Debug, Default)]
pub struct ObserverIndex {
    keyed: RwLock<HashMap<String, Vec<Observer>>>,
    conn: RwLock<Vec<Observer>>,
}

impl ObserverIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `observer` to the list for `key`; no-op when already there.
    pub fn add_keyed(
        &self,
        key: &str,
        observer: Observer,
    ) {
        let mut keyed = self.keyed.write();
        let list = keyed.entry(key.to_string()).or_default();
        if !list.contains(&observer) {
            list.push(observer);
        }
    }

    /// Removes the first matching observer; empty lists are retained.
    pub fn remove_keyed(
        &self,
        key: &str,
        observer: Observer,
    ) {
        let mut keyed = self.keyed.write();
        if let Some(list) = keyed.get_mut(key) {
            remove_first(list, observer);
        }
    }

    /// Removes `observer` from every keyed list.
    pub fn remove_keyed_all(
        &self,
        observer: Observer,
    ) {
        let mut keyed = self.keyed.write();
        for list in keyed.values_mut() {
            remove_first(list, observer);
        }
    }

    /// Copy of the list for `key`; `None` when the key was never watched.
    pub fn clone_keyed(
        &self,
        key: &str,
    ) -> Option<Vec<Observer>> {
        self.keyed.read().get(key).cloned()
    }

    pub fn add_conn(
        &self,
        observer: Observer,
    ) {
        let mut conn = self.conn.write();
        if !conn.contains(&observer) {
            conn.push(observer);
        }
    }

    pub fn remove_conn(
        &self,
        observer: Observer,
    ) {
        let mut conn = self.conn.write();
        remove_first(&mut conn, observer);
    }

    pub fn clone_conn(&self) -> Vec<Observer> {
        self.conn.read().clone()
    }
}

fn remove_first(
    list: &mut Vec<Observer>,
    observer: Observer,
) {
    if let Some(idx) = list.iter().position(|o| *o == observer) {
        list.remove(idx);
    }
}
