#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    use super::super::notifier::PushNotifier;
    use crate::test_utils::PushRecord;
    use crate::test_utils::RecordingPusher;
    use crate::Observer;
    use crate::ObserverIndex;
    use reghub_proto::ConnChange;
    use reghub_proto::ConnChangePush;
    use reghub_proto::DataOp;
    use reghub_proto::DataOpPush;
    use reghub_proto::KeyType;
    use reghub_proto::MAX_PUSH_QUEUE;
    use reghub_proto::PUSH_MARK;

    struct Pipeline {
        data_op_tx: mpsc::Sender<DataOpPush>,
        conn_change_tx: mpsc::Sender<ConnChangePush>,
        observers: Arc<ObserverIndex>,
        pushed_rx: mpsc::UnboundedReceiver<PushRecord>,
        worker: JoinHandle<()>,
    }

    fn start_pipeline() -> Pipeline {
        let (data_op_tx, data_op_rx) = mpsc::channel(MAX_PUSH_QUEUE);
        let (conn_change_tx, conn_change_rx) = mpsc::channel(MAX_PUSH_QUEUE);
        let observers = Arc::new(ObserverIndex::new());
        let (pusher, pushed_rx) = RecordingPusher::channel();

        let notifier = PushNotifier::new(data_op_rx, conn_change_rx, observers.clone(), pusher);
        let worker = tokio::spawn(notifier.run());

        Pipeline {
            data_op_tx,
            conn_change_tx,
            observers,
            pushed_rx,
            worker,
        }
    }

    async fn recv(pipeline: &mut Pipeline) -> PushRecord {
        timeout(Duration::from_millis(200), pipeline.pushed_rx.recv())
            .await
            .expect("push within deadline")
            .expect("channel open")
    }

    async fn assert_no_more(pipeline: &mut Pipeline) {
        let extra = timeout(Duration::from_millis(50), pipeline.pushed_rx.recv()).await;
        assert!(extra.is_err(), "unexpected extra push: {extra:?}");
    }

    fn update(key: &str) -> DataOpPush {
        DataOpPush::new(KeyType::SrvInfo, key, DataOp::Update)
    }

    #[tokio::test]
    async fn test_exact_key_observer_receives_frame() {
        let mut pipeline = start_pipeline();
        pipeline.observers.add_keyed("/9/9", Observer::new(100, 1));

        pipeline.data_op_tx.send(update("/9/9")).await.expect("send");

        let record = recv(&mut pipeline).await;
        assert_eq!((record.dst_type, record.dst_no), (100, 1));
        assert_eq!(record.pack_header().mark, PUSH_MARK);
        assert_eq!(record.data_op().expect("data op"), update("/9/9"));

        assert_no_more(&mut pipeline).await;
    }

    #[tokio::test]
    async fn test_parent_key_fan_out() {
        let mut pipeline = start_pipeline();
        pipeline.observers.add_keyed("/7/42", Observer::new(100, 1));
        pipeline.observers.add_keyed("/7", Observer::new(200, 1));

        pipeline
            .data_op_tx
            .send(update("/7/42"))
            .await
            .expect("send");

        let mut destinations = vec![];
        for _ in 0..2 {
            let record = recv(&mut pipeline).await;
            assert_eq!(record.data_op().expect("data op").key, "/7/42");
            destinations.push((record.dst_type, record.dst_no));
        }
        destinations.sort_unstable();
        assert_eq!(destinations, vec![(100, 1), (200, 1)]);

        assert_no_more(&mut pipeline).await;
    }

    #[tokio::test]
    async fn test_top_level_key_has_no_parent_delivery() {
        let mut pipeline = start_pipeline();
        pipeline.observers.add_keyed("/7", Observer::new(200, 1));

        pipeline.data_op_tx.send(update("/7")).await.expect("send");

        let record = recv(&mut pipeline).await;
        assert_eq!((record.dst_type, record.dst_no), (200, 1));
        assert_no_more(&mut pipeline).await;
    }

    #[tokio::test]
    async fn test_at_most_once_per_event_per_observer() {
        let mut pipeline = start_pipeline();
        // One observer per list; each clone delivers exactly one frame.
        pipeline.observers.add_keyed("/7/42", Observer::new(100, 1));
        pipeline.observers.add_keyed("/7", Observer::new(200, 2));

        pipeline
            .data_op_tx
            .send(update("/7/42"))
            .await
            .expect("send");

        let first = recv(&mut pipeline).await;
        let second = recv(&mut pipeline).await;
        assert_ne!(
            (first.dst_type, first.dst_no),
            (second.dst_type, second.dst_no)
        );
        assert_no_more(&mut pipeline).await;
    }

    #[tokio::test]
    async fn test_conn_change_fans_out_to_conn_set_only() {
        let mut pipeline = start_pipeline();
        pipeline.observers.add_conn(Observer::new(1, 1));
        pipeline.observers.add_conn(Observer::new(2, 2));
        pipeline.observers.add_keyed("/9/9", Observer::new(3, 3));

        let event = ConnChangePush::new(9, 9, ConnChange::Open);
        pipeline.conn_change_tx.send(event).await.expect("send");

        for _ in 0..2 {
            let record = recv(&mut pipeline).await;
            assert_eq!(record.conn_change().expect("conn change"), event);
            assert!(record.dst_type == 1 || record.dst_type == 2);
        }
        assert_no_more(&mut pipeline).await;
    }

    #[tokio::test]
    async fn test_no_observers_no_frames() {
        let mut pipeline = start_pipeline();

        pipeline
            .data_op_tx
            .send(update("/1/1"))
            .await
            .expect("send");
        pipeline
            .conn_change_tx
            .send(ConnChangePush::new(1, 1, ConnChange::Close))
            .await
            .expect("send");

        assert_no_more(&mut pipeline).await;
    }

    #[tokio::test]
    async fn test_fifo_within_data_queue() {
        let mut pipeline = start_pipeline();
        pipeline.observers.add_keyed("/g/x", Observer::new(5, 5));

        for operate in [DataOp::Update, DataOp::Remove] {
            pipeline
                .data_op_tx
                .send(DataOpPush::new(KeyType::GlobalData, "/g/x", operate))
                .await
                .expect("send");
        }

        assert_eq!(recv(&mut pipeline).await.data_op().unwrap().operate, DataOp::Update);
        assert_eq!(recv(&mut pipeline).await.data_op().unwrap().operate, DataOp::Remove);
    }

    #[tokio::test]
    async fn test_worker_exits_when_queue_closes() {
        let pipeline = start_pipeline();

        drop(pipeline.data_op_tx);

        timeout(Duration::from_millis(200), pipeline.worker)
            .await
            .expect("worker exits after queue close")
            .expect("join");
    }

    #[tokio::test]
    async fn test_push_failure_does_not_stop_the_loop() {
        let (data_op_tx, data_op_rx) = mpsc::channel(MAX_PUSH_QUEUE);
        let (_conn_change_tx, conn_change_rx) = mpsc::channel(MAX_PUSH_QUEUE);

        let observers = Arc::new(ObserverIndex::new());
        observers.add_keyed("/1/1", Observer::new(1, 1));
        observers.add_keyed("/1/1", Observer::new(2, 2));

        let mut pusher = crate::MockPusher::new();
        pusher
            .expect_push()
            .withf(|dst_type, dst_no, _, _| (*dst_type, *dst_no) == (1, 1))
            .times(1)
            .returning(|_, _, _, _| Err(crate::PushError::Transport("boom".into()).into()));
        pusher
            .expect_push()
            .withf(|dst_type, dst_no, _, _| (*dst_type, *dst_no) == (2, 2))
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let notifier =
            PushNotifier::new(data_op_rx, conn_change_rx, observers, Arc::new(pusher));
        let worker = tokio::spawn(notifier.run());

        data_op_tx.send(update("/1/1")).await.expect("send");
        drop(data_op_tx);

        // Both expectations are checked when the mock drops with the worker.
        timeout(Duration::from_millis(300), worker)
            .await
            .expect("worker exits")
            .expect("join");
    }
}
