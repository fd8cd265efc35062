#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tempfile::tempdir;
    use tempfile::TempDir;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use crate::RegService;
    use reghub_core::test_utils::PushRecord;
    use reghub_core::test_utils::RecordingPusher;
    use reghub_core::HubConfig;
    use reghub_core::Observer;
    use reghub_core::RegHub;
    use reghub_proto::res_code;
    use reghub_proto::KeyReq;
    use reghub_proto::MethodCall;
    use reghub_proto::MethodReply;
    use reghub_proto::SrvIdReq;
    use reghub_proto::SrvRecord;
    use reghub_proto::SrvTypeReq;
    use reghub_proto::UpdateGlobalDataReq;
    use reghub_proto::UpdateSrvReq;

    struct Fixture {
        service: RegService,
        pushed_rx: mpsc::UnboundedReceiver<PushRecord>,
        _dir: TempDir,
    }

    fn start_service() -> Fixture {
        let dir = tempdir().expect("tempdir");
        let (pusher, pushed_rx) = RecordingPusher::channel();
        let hub = Arc::new(RegHub::new(
            HubConfig::new(dir.path().join("reg.json")),
            pusher,
        ));
        hub.start();

        Fixture {
            service: RegService::new(hub),
            pushed_rx,
            _dir: dir,
        }
    }

    fn src() -> Observer {
        Observer::new(500, 1)
    }

    fn update_srv_call(
        srv_type: u32,
        srv_no: u32,
        payload: &str,
    ) -> MethodCall {
        MethodCall::UpdateSrv(UpdateSrvReq {
            record: SrvRecord::new(srv_type, srv_no, false, payload),
        })
    }

    #[tokio::test]
    async fn test_update_then_get_srv() {
        let fixture = start_service();

        let reply = fixture
            .service
            .handle(src(), update_srv_call(7, 42, "pp"))
            .await;
        assert_eq!(reply, MethodReply::Base(reghub_proto::BaseResp::succ()));

        let reply = fixture
            .service
            .handle(
                src(),
                MethodCall::GetSrv(SrvIdReq {
                    srv_type: 7,
                    srv_no: 42,
                }),
            )
            .await;

        match reply {
            MethodReply::GetSrv(resp) => {
                assert!(resp.base.is_succ());
                assert_eq!(resp.data.expect("record").payload_b64, "pp");
            }
            other => panic!("unexpected reply: {other:?}"),
        }

        fixture.service.hub().stop().await;
    }

    #[tokio::test]
    async fn test_get_srv_not_exists_code() {
        let fixture = start_service();

        let reply = fixture
            .service
            .handle(
                src(),
                MethodCall::GetSrv(SrvIdReq {
                    srv_type: 1,
                    srv_no: 1,
                }),
            )
            .await;

        match reply {
            MethodReply::GetSrv(resp) => {
                assert_eq!(resp.base.res_code, res_code::SRV_NOT_EXISTS);
                assert!(resp.data.is_none());
            }
            other => panic!("unexpected reply: {other:?}"),
        }

        fixture.service.hub().stop().await;
    }

    #[tokio::test]
    async fn test_get_srvs_by_type_codes() {
        let fixture = start_service();

        let reply = fixture
            .service
            .handle(src(), MethodCall::GetSrvsByType(SrvTypeReq { srv_type: 9 }))
            .await;
        assert_eq!(reply.res_code(), res_code::SRV_TYPE_NOT_EXISTS);

        fixture
            .service
            .handle(src(), update_srv_call(9, 1, "a"))
            .await;
        fixture
            .service
            .handle(src(), update_srv_call(9, 2, "b"))
            .await;

        let reply = fixture
            .service
            .handle(src(), MethodCall::GetSrvsByType(SrvTypeReq { srv_type: 9 }))
            .await;

        match reply {
            MethodReply::GetSrvs(resp) => {
                assert!(resp.base.is_succ());
                assert_eq!(resp.data.len(), 2);
            }
            other => panic!("unexpected reply: {other:?}"),
        }

        fixture.service.hub().stop().await;
    }

    #[tokio::test]
    async fn test_get_srvs_by_type_emptied_type_answers_succ_empty() {
        let fixture = start_service();

        fixture
            .service
            .handle(src(), update_srv_call(9, 1, "a"))
            .await;
        fixture
            .service
            .handle(src(), update_srv_call(9, 2, "b"))
            .await;
        for srv_no in [1, 2] {
            fixture
                .service
                .handle(
                    src(),
                    MethodCall::RemoveSrv(SrvIdReq {
                        srv_type: 9,
                        srv_no,
                    }),
                )
                .await;
        }

        // The type node outlives its last record, so an emptied type is
        // an empty success, not SRV_TYPE_NOT_EXISTS.
        let reply = fixture
            .service
            .handle(src(), MethodCall::GetSrvsByType(SrvTypeReq { srv_type: 9 }))
            .await;

        match reply {
            MethodReply::GetSrvs(resp) => {
                assert_eq!(resp.base.res_code, res_code::SUCC);
                assert!(resp.data.is_empty());
            }
            other => panic!("unexpected reply: {other:?}"),
        }

        fixture.service.hub().stop().await;
    }

    #[tokio::test]
    async fn test_global_data_codes() {
        let fixture = start_service();

        let reply = fixture
            .service
            .handle(
                src(),
                MethodCall::GetGlobalData(KeyReq {
                    key: "/g/x".to_string(),
                }),
            )
            .await;
        assert_eq!(reply.res_code(), res_code::GLOBAL_DATA_NOT_EXISTS);

        fixture
            .service
            .handle(
                src(),
                MethodCall::UpdateGlobalData(UpdateGlobalDataReq {
                    key: "/g/x".to_string(),
                    payload_b64: "Z3Y=".to_string(),
                }),
            )
            .await;

        let reply = fixture
            .service
            .handle(
                src(),
                MethodCall::GetGlobalData(KeyReq {
                    key: "/g/x".to_string(),
                }),
            )
            .await;

        match reply {
            MethodReply::GetGlobal(resp) => {
                assert!(resp.base.is_succ());
                assert_eq!(resp.payload_b64, "Z3Y=");
            }
            other => panic!("unexpected reply: {other:?}"),
        }

        fixture.service.hub().stop().await;
    }

    #[tokio::test]
    async fn test_watch_uses_source_identity() {
        let mut fixture = start_service();

        fixture
            .service
            .handle(
                src(),
                MethodCall::WatchSrv(SrvIdReq {
                    srv_type: 7,
                    srv_no: 42,
                }),
            )
            .await;

        fixture
            .service
            .handle(Observer::new(7, 42), update_srv_call(7, 42, "v"))
            .await;

        let record = timeout(Duration::from_millis(200), fixture.pushed_rx.recv())
            .await
            .expect("push within deadline")
            .expect("channel open");
        assert_eq!((record.dst_type, record.dst_no), (500, 1));
        assert_eq!(record.data_op().expect("data op").key, "/7/42");

        fixture.service.hub().stop().await;
    }

    #[tokio::test]
    async fn test_stop_all_watch_covers_conn_set() {
        let mut fixture = start_service();

        fixture.service.handle(src(), MethodCall::WatchConn).await;
        fixture
            .service
            .handle(
                src(),
                MethodCall::WatchSrv(SrvIdReq {
                    srv_type: 1,
                    srv_no: 1,
                }),
            )
            .await;

        // StopAllWatch names the target peer in the request body.
        fixture
            .service
            .handle(
                Observer::new(0, 0),
                MethodCall::StopAllWatch(SrvIdReq {
                    srv_type: 500,
                    srv_no: 1,
                }),
            )
            .await;

        fixture
            .service
            .handle(src(), update_srv_call(1, 1, "v"))
            .await;
        fixture
            .service
            .hub()
            .notify_conn_change(1, 1, reghub_proto::ConnChange::Open)
            .await;

        let extra = timeout(Duration::from_millis(80), fixture.pushed_rx.recv()).await;
        assert!(extra.is_err(), "unexpected push: {extra:?}");

        fixture.service.hub().stop().await;
    }
}
