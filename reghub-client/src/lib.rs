//! # reghub-client
//!
//! Client-side API for the reghub service registry.
//!
//! Two halves, matching the two directions of the protocol:
//!
//! - [`RegClient`] — a thin wrapper over a [`CallTransport`], one method
//!   per registry RPC. Opaque payloads are passed as raw bytes and
//!   base64-encoded here; every call runs under a 3-second timeout and
//!   any non-success result code collapses into
//!   [`ClientApiError::CallFailed`].
//! - [`PushObserver`] — consumes raw push frames from a [`PushSource`],
//!   validates the pack header and routes decoded bodies into typed
//!   channels ([`PushObserver::pop_data_op`] /
//!   [`PushObserver::pop_conn_change`]).

mod error;
mod observer;
mod transport;


pub use error::ClientApiError;
pub use observer::PushObserver;
pub use observer::PushSource;
pub use transport::CallTransport;

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use tokio::time::timeout;

use reghub_proto::res_code;
use reghub_proto::KeyReq;
use reghub_proto::MethodCall;
use reghub_proto::MethodReply;
use reghub_proto::SrvIdReq;
use reghub_proto::SrvRecord;
use reghub_proto::SrvTypeReq;
use reghub_proto::UpdateGlobalDataReq;
use reghub_proto::UpdateSrvReq;
use reghub_proto::CALL_TIMEOUT_SECS;

/// Registry RPC client.
pub struct RegClient<T> {
    transport: T,
    call_timeout: Duration,
}

impl<T> RegClient<T>
where
    T: CallTransport,
{
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            call_timeout: Duration::from_secs(CALL_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(
        mut self,
        call_timeout: Duration,
    ) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub async fn update_srv(
        &self,
        srv_type: u32,
        srv_no: u32,
        is_temp: bool,
        payload: &[u8],
    ) -> Result<(), ClientApiError> {
        let record = SrvRecord::new(srv_type, srv_no, is_temp, BASE64_STANDARD.encode(payload));
        self.call_expect_base(MethodCall::UpdateSrv(UpdateSrvReq { record }))
            .await
    }

    pub async fn remove_srv(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) -> Result<(), ClientApiError> {
        self.call_expect_base(MethodCall::RemoveSrv(SrvIdReq { srv_type, srv_no }))
            .await
    }

    pub async fn get_srv(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) -> Result<SrvRecord, ClientApiError> {
        let reply = self
            .call(MethodCall::GetSrv(SrvIdReq { srv_type, srv_no }))
            .await?;
        match reply {
            MethodReply::GetSrv(resp) => resp.data.ok_or(ClientApiError::MissingData {
                method: "GetSrv",
            }),
            _ => Err(ClientApiError::UnexpectedReply { method: "GetSrv" }),
        }
    }

    pub async fn get_srv_by_key(
        &self,
        key: &str,
    ) -> Result<SrvRecord, ClientApiError> {
        let reply = self
            .call(MethodCall::GetSrvByKey(KeyReq {
                key: key.to_string(),
            }))
            .await?;
        match reply {
            MethodReply::GetSrv(resp) => resp.data.ok_or(ClientApiError::MissingData {
                method: "GetSrvByKey",
            }),
            _ => Err(ClientApiError::UnexpectedReply {
                method: "GetSrvByKey",
            }),
        }
    }

    pub async fn get_srvs_by_type(
        &self,
        srv_type: u32,
    ) -> Result<Vec<SrvRecord>, ClientApiError> {
        let reply = self
            .call(MethodCall::GetSrvsByType(SrvTypeReq { srv_type }))
            .await?;
        match reply {
            MethodReply::GetSrvs(resp) => Ok(resp.data),
            _ => Err(ClientApiError::UnexpectedReply {
                method: "GetSrvsByType",
            }),
        }
    }

    pub async fn watch_srv(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) -> Result<(), ClientApiError> {
        self.call_expect_base(MethodCall::WatchSrv(SrvIdReq { srv_type, srv_no }))
            .await
    }

    pub async fn stop_watch_srv(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) -> Result<(), ClientApiError> {
        self.call_expect_base(MethodCall::StopWatchSrv(SrvIdReq { srv_type, srv_no }))
            .await
    }

    pub async fn watch_srvs_by_type(
        &self,
        srv_type: u32,
    ) -> Result<(), ClientApiError> {
        self.call_expect_base(MethodCall::WatchSrvsByType(SrvTypeReq { srv_type }))
            .await
    }

    pub async fn stop_watch_srvs_by_type(
        &self,
        srv_type: u32,
    ) -> Result<(), ClientApiError> {
        self.call_expect_base(MethodCall::StopWatchSrvsByType(SrvTypeReq { srv_type }))
            .await
    }

    pub async fn update_global_data(
        &self,
        key: &str,
        payload: &[u8],
    ) -> Result<(), ClientApiError> {
        self.call_expect_base(MethodCall::UpdateGlobalData(UpdateGlobalDataReq {
            key: key.to_string(),
            payload_b64: BASE64_STANDARD.encode(payload),
        }))
        .await
    }

    pub async fn remove_global_data(
        &self,
        key: &str,
    ) -> Result<(), ClientApiError> {
        self.call_expect_base(MethodCall::RemoveGlobalData(KeyReq {
            key: key.to_string(),
        }))
        .await
    }

    pub async fn get_global_data(
        &self,
        key: &str,
    ) -> Result<Vec<u8>, ClientApiError> {
        let reply = self
            .call(MethodCall::GetGlobalData(KeyReq {
                key: key.to_string(),
            }))
            .await?;
        match reply {
            MethodReply::GetGlobal(resp) => {
                Ok(BASE64_STANDARD.decode(resp.payload_b64.as_bytes())?)
            }
            _ => Err(ClientApiError::UnexpectedReply {
                method: "GetGlobalData",
            }),
        }
    }

    pub async fn watch_global_data(
        &self,
        key: &str,
    ) -> Result<(), ClientApiError> {
        self.call_expect_base(MethodCall::WatchGlobalData(KeyReq {
            key: key.to_string(),
        }))
        .await
    }

    pub async fn stop_watch_global_data(
        &self,
        key: &str,
    ) -> Result<(), ClientApiError> {
        self.call_expect_base(MethodCall::StopWatchGlobalData(KeyReq {
            key: key.to_string(),
        }))
        .await
    }

    pub async fn watch_conn(&self) -> Result<(), ClientApiError> {
        self.call_expect_base(MethodCall::WatchConn).await
    }

    pub async fn stop_watch_conn(&self) -> Result<(), ClientApiError> {
        self.call_expect_base(MethodCall::StopWatchConn).await
    }

    pub async fn stop_all_watch(
        &self,
        srv_type: u32,
        srv_no: u32,
    ) -> Result<(), ClientApiError> {
        self.call_expect_base(MethodCall::StopAllWatch(SrvIdReq { srv_type, srv_no }))
            .await
    }

    /// Runs one call under the client timeout and collapses non-success
    /// result codes into [`ClientApiError::CallFailed`].
    async fn call(
        &self,
        call: MethodCall,
    ) -> Result<MethodReply, ClientApiError> {
        let reply = timeout(self.call_timeout, self.transport.call(call))
            .await
            .map_err(|_| ClientApiError::Timeout(self.call_timeout))??;

        if reply.res_code() != res_code::SUCC {
            return Err(ClientApiError::CallFailed {
                code: reply.res_code(),
                msg: reply.res_msg().to_string(),
            });
        }

        Ok(reply)
    }

    async fn call_expect_base(
        &self,
        call: MethodCall,
    ) -> Result<(), ClientApiError> {
        let method = call.method_name();
        match self.call(call).await? {
            MethodReply::Base(_) => Ok(()),
            _ => Err(ClientApiError::UnexpectedReply { method }),
        }
    }
}
