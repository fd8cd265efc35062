//! Decoded request/response shapes and the snapshot file schema.
//!
//! The transport decodes incoming packs into a [`MethodCall`] and encodes
//! the returned [`MethodReply`]; the registry core never sees raw bytes.
//! Wire field names are pinned with serde renames so any JSON-speaking
//! transport stays compatible with the registry protocol.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::res_code;

/// One registered service endpoint.
///
/// Identified by `(srv_type, srv_no)`. The payload is opaque to the
/// registry and travels base64-encoded. Temporary records are excluded
/// from snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvRecord {
    #[serde(rename = "type")]
    pub srv_type: u32,

    #[serde(rename = "no")]
    pub srv_no: u32,

    #[serde(rename = "bTemp")]
    pub is_temp: bool,

    #[serde(rename = "data")]
    pub payload_b64: String,
}

impl SrvRecord {
    pub fn new(
        srv_type: u32,
        srv_no: u32,
        is_temp: bool,
        payload_b64: impl Into<String>,
    ) -> Self {
        Self {
            srv_type,
            srv_no,
            is_temp,
            payload_b64: payload_b64.into(),
        }
    }
}

/// On-disk snapshot of the registry.
///
/// Both sections are optional on load so partial or legacy files still
/// parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub srv: Vec<SrvRecord>,

    #[serde(default)]
    pub global: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSrvReq {
    #[serde(flatten)]
    pub record: SrvRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvIdReq {
    #[serde(rename = "type")]
    pub srv_type: u32,

    #[serde(rename = "no")]
    pub srv_no: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvTypeReq {
    #[serde(rename = "type")]
    pub srv_type: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyReq {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateGlobalDataReq {
    pub key: String,

    #[serde(rename = "data")]
    pub payload_b64: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Result code plus message, embedded in every response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseResp {
    #[serde(rename = "resCode")]
    pub res_code: u32,

    #[serde(default)]
    pub msg: String,
}

impl BaseResp {
    pub fn succ() -> Self {
        Self {
            res_code: res_code::SUCC,
            msg: String::new(),
        }
    }

    pub fn with_code(
        res_code: u32,
        msg: impl Into<String>,
    ) -> Self {
        Self {
            res_code,
            msg: msg.into(),
        }
    }

    pub fn is_succ(&self) -> bool {
        self.res_code == res_code::SUCC
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetSrvResp {
    #[serde(flatten)]
    pub base: BaseResp,

    pub data: Option<SrvRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetSrvsByTypeResp {
    #[serde(flatten)]
    pub base: BaseResp,

    #[serde(default)]
    pub data: Vec<SrvRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetGlobalDataResp {
    #[serde(flatten)]
    pub base: BaseResp,

    #[serde(rename = "data", default)]
    pub payload_b64: String,
}

// ---------------------------------------------------------------------------
// Method-level interface between transport and core
// ---------------------------------------------------------------------------

/// One decoded registry RPC, as handed to the core by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodCall {
    UpdateSrv(UpdateSrvReq),
    RemoveSrv(SrvIdReq),
    GetSrv(SrvIdReq),
    GetSrvByKey(KeyReq),
    GetSrvsByType(SrvTypeReq),
    WatchSrv(SrvIdReq),
    StopWatchSrv(SrvIdReq),
    WatchSrvsByType(SrvTypeReq),
    StopWatchSrvsByType(SrvTypeReq),
    UpdateGlobalData(UpdateGlobalDataReq),
    RemoveGlobalData(KeyReq),
    GetGlobalData(KeyReq),
    WatchGlobalData(KeyReq),
    StopWatchGlobalData(KeyReq),
    WatchConn,
    StopWatchConn,
    StopAllWatch(SrvIdReq),
}

impl MethodCall {
    /// Stable method name, for dispatch tables and logging.
    pub fn method_name(&self) -> &'static str {
        match self {
            MethodCall::UpdateSrv(_) => "UpdateSrv",
            MethodCall::RemoveSrv(_) => "RemoveSrv",
            MethodCall::GetSrv(_) => "GetSrv",
            MethodCall::GetSrvByKey(_) => "GetSrvByKey",
            MethodCall::GetSrvsByType(_) => "GetSrvsByType",
            MethodCall::WatchSrv(_) => "WatchSrv",
            MethodCall::StopWatchSrv(_) => "StopWatchSrv",
            MethodCall::WatchSrvsByType(_) => "WatchSrvsByType",
            MethodCall::StopWatchSrvsByType(_) => "StopWatchSrvsByType",
            MethodCall::UpdateGlobalData(_) => "UpdateGlobalData",
            MethodCall::RemoveGlobalData(_) => "RemoveGlobalData",
            MethodCall::GetGlobalData(_) => "GetGlobalData",
            MethodCall::WatchGlobalData(_) => "WatchGlobalData",
            MethodCall::StopWatchGlobalData(_) => "StopWatchGlobalData",
            MethodCall::WatchConn => "WatchConn",
            MethodCall::StopWatchConn => "StopWatchConn",
            MethodCall::StopAllWatch(_) => "StopAllWatch",
        }
    }
}

/// The decoded reply handed back to the transport for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodReply {
    Base(BaseResp),
    GetSrv(GetSrvResp),
    GetSrvs(GetSrvsByTypeResp),
    GetGlobal(GetGlobalDataResp),
}

impl MethodReply {
    /// The embedded result code, whatever the reply shape.
    pub fn res_code(&self) -> u32 {
        self.base().res_code
    }

    /// The embedded result message.
    pub fn res_msg(&self) -> &str {
        &self.base().msg
    }

    fn base(&self) -> &BaseResp {
        match self {
            MethodReply::Base(resp) => resp,
            MethodReply::GetSrv(resp) => &resp.base,
            MethodReply::GetSrvs(resp) => &resp.base,
            MethodReply::GetGlobal(resp) => &resp.base,
        }
    }
}
