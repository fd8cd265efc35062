//! Method-call dispatch: the object the RPC transport drives.
//!
//! Each decoded [`MethodCall`] maps onto one hub operation; reads turn
//! absence into the typed not-exists result codes, mutations and watch
//! registrations always answer success. The source peer identity carried
//! on every RPC becomes the observer identity for watch calls.

use std::sync::Arc;

use tracing::trace;

use reghub_core::Observer;
use reghub_core::RegHub;
use reghub_proto::res_code;
use reghub_proto::BaseResp;
use reghub_proto::GetGlobalDataResp;
use reghub_proto::GetSrvResp;
use reghub_proto::GetSrvsByTypeResp;
use reghub_proto::MethodCall;
use reghub_proto::MethodReply;
use reghub_proto::SrvRecord;

pub struct RegService {
    hub: Arc<RegHub>,
}

impl RegService {
    pub fn new(hub: Arc<RegHub>) -> Self {
        Self { hub }
    }

    pub fn hub(&self) -> &Arc<RegHub> {
        &self.hub
    }

    /// Handles one decoded registry RPC from peer `src`.
    pub async fn handle(
        &self,
        src: Observer,
        call: MethodCall,
    ) -> MethodReply {
        trace!(
            method = call.method_name(),
            src_type = src.srv_type,
            src_no = src.srv_no,
            "dispatching registry call"
        );

        match call {
            MethodCall::UpdateSrv(req) => {
                let SrvRecord {
                    srv_type,
                    srv_no,
                    is_temp,
                    payload_b64,
                } = req.record;
                self.hub
                    .update_srv(srv_type, srv_no, is_temp, payload_b64)
                    .await;
                MethodReply::Base(BaseResp::succ())
            }

            MethodCall::RemoveSrv(req) => {
                self.hub.remove_srv(req.srv_type, req.srv_no).await;
                MethodReply::Base(BaseResp::succ())
            }

            MethodCall::GetSrv(req) => {
                Self::srv_reply(self.hub.get_srv(req.srv_type, req.srv_no))
            }

            MethodCall::GetSrvByKey(req) => Self::srv_reply(self.hub.get_srv_by_key(&req.key)),

            MethodCall::GetSrvsByType(req) => {
                let reply = match self.hub.get_srvs_by_type(req.srv_type) {
                    Some(data) => GetSrvsByTypeResp {
                        base: BaseResp::succ(),
                        data,
                    },
                    None => GetSrvsByTypeResp {
                        base: BaseResp::with_code(
                            res_code::SRV_TYPE_NOT_EXISTS,
                            "server type not exists",
                        ),
                        data: Vec::new(),
                    },
                };
                MethodReply::GetSrvs(reply)
            }

            MethodCall::WatchSrv(req) => {
                self.hub.watch_srv(src, req.srv_type, req.srv_no);
                MethodReply::Base(BaseResp::succ())
            }

            MethodCall::StopWatchSrv(req) => {
                self.hub.stop_watch_srv(src, req.srv_type, req.srv_no);
                MethodReply::Base(BaseResp::succ())
            }

            MethodCall::WatchSrvsByType(req) => {
                self.hub.watch_srvs_by_type(src, req.srv_type);
                MethodReply::Base(BaseResp::succ())
            }

            MethodCall::StopWatchSrvsByType(req) => {
                self.hub.stop_watch_srvs_by_type(src, req.srv_type);
                MethodReply::Base(BaseResp::succ())
            }

            MethodCall::UpdateGlobalData(req) => {
                self.hub
                    .update_global_data(&req.key, req.payload_b64)
                    .await;
                MethodReply::Base(BaseResp::succ())
            }

            MethodCall::RemoveGlobalData(req) => {
                self.hub.remove_global_data(&req.key).await;
                MethodReply::Base(BaseResp::succ())
            }

            MethodCall::GetGlobalData(req) => {
                let reply = match self.hub.get_global_data(&req.key) {
                    Some(payload_b64) => GetGlobalDataResp {
                        base: BaseResp::succ(),
                        payload_b64,
                    },
                    None => GetGlobalDataResp {
                        base: BaseResp::with_code(
                            res_code::GLOBAL_DATA_NOT_EXISTS,
                            "global data not exists",
                        ),
                        payload_b64: String::new(),
                    },
                };
                MethodReply::GetGlobal(reply)
            }

            MethodCall::WatchGlobalData(req) => {
                self.hub.watch_global_data(src, &req.key);
                MethodReply::Base(BaseResp::succ())
            }

            MethodCall::StopWatchGlobalData(req) => {
                self.hub.stop_watch_global_data(src, &req.key);
                MethodReply::Base(BaseResp::succ())
            }

            MethodCall::WatchConn => {
                self.hub.watch_conn(src);
                MethodReply::Base(BaseResp::succ())
            }

            MethodCall::StopWatchConn => {
                self.hub.stop_watch_conn(src);
                MethodReply::Base(BaseResp::succ())
            }

            MethodCall::StopAllWatch(req) => {
                self.hub
                    .stop_all_watch(Observer::new(req.srv_type, req.srv_no));
                MethodReply::Base(BaseResp::succ())
            }
        }
    }

    fn srv_reply(record: Option<SrvRecord>) -> MethodReply {
        let reply = match record {
            Some(record) => GetSrvResp {
                base: BaseResp::succ(),
                data: Some(record),
            },
            None => GetSrvResp {
                base: BaseResp::with_code(res_code::SRV_NOT_EXISTS, "server not exists"),
                data: None,
            },
        };
        MethodReply::GetSrv(reply)
    }
}
