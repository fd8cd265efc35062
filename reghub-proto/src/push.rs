//! Push frame bodies.
//!
//! The notifier emits two kinds of pushes, routed by the header's func
//! number: data-operation pushes for watched keys and connection-change
//! pushes for the connection observer set. Bodies are JSON with the wire
//! field names pinned below.

use serde::Deserialize;
use serde::Serialize;

use crate::CONN_CHANGE_PUSH_FUNC_NO;
use crate::DATA_OPR_PUSH_FUNC_NO;

/// Which tree a data-operation push refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum KeyType {
    SrvInfo = 1,
    GlobalData = 2,
}

impl TryFrom<u8> for KeyType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(KeyType::SrvInfo),
            2 => Ok(KeyType::GlobalData),
            other => Err(format!("unknown key type: {other}")),
        }
    }
}

impl From<KeyType> for u8 {
    fn from(value: KeyType) -> Self {
        value as u8
    }
}

/// What happened to the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DataOp {
    Update = 1,
    Remove = 2,
}

impl TryFrom<u8> for DataOp {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DataOp::Update),
            2 => Ok(DataOp::Remove),
            other => Err(format!("unknown data operation: {other}")),
        }
    }
}

impl From<DataOp> for u8 {
    fn from(value: DataOp) -> Self {
        value as u8
    }
}

/// Direction of a peer connection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ConnChange {
    Open = 1,
    Close = 2,
}

impl TryFrom<u8> for ConnChange {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ConnChange::Open),
            2 => Ok(ConnChange::Close),
            other => Err(format!("unknown connection change: {other}")),
        }
    }
}

impl From<ConnChange> for u8 {
    fn from(value: ConnChange) -> Self {
        value as u8
    }
}

/// Body of a data-operation push (func number 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataOpPush {
    pub key_type: KeyType,

    pub key: String,

    #[serde(rename = "opr")]
    pub operate: DataOp,
}

impl DataOpPush {
    pub fn new(
        key_type: KeyType,
        key: impl Into<String>,
        operate: DataOp,
    ) -> Self {
        Self {
            key_type,
            key: key.into(),
            operate,
        }
    }
}

/// Body of a connection-change push (func number 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnChangePush {
    #[serde(rename = "type")]
    pub srv_type: u32,

    #[serde(rename = "no")]
    pub srv_no: u32,

    pub change: ConnChange,
}

impl ConnChangePush {
    pub fn new(
        srv_type: u32,
        srv_no: u32,
        change: ConnChange,
    ) -> Self {
        Self {
            srv_type,
            srv_no,
            change,
        }
    }
}

/// Either kind of push, tagged with its func number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    DataOp(DataOpPush),
    ConnChange(ConnChangePush),
}

impl PushEvent {
    /// Func number the frame header carries for this body shape.
    pub fn func_no(&self) -> u16 {
        match self {
            PushEvent::DataOp(_) => DATA_OPR_PUSH_FUNC_NO,
            PushEvent::ConnChange(_) => CONN_CHANGE_PUSH_FUNC_NO,
        }
    }

    /// Serializes the inner body (not the enum wrapper) to JSON.
    pub fn encode_body(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            PushEvent::DataOp(body) => serde_json::to_vec(body),
            PushEvent::ConnChange(body) => serde_json::to_vec(body),
        }
    }
}
