//! Sync coordinator
//!
//! State machine with two states, Online and Offline, driven by the
//! [`ConnectivityObserver`]. While offline (or when the server turns out
//! to be unreachable) every mutating operation is appended to the durable
//! queue instead of being sent; on the transition back to Online the
//! queue is drained sequentially in insertion order, so one terminal's
//! edits replay in the order the operator made them.
//!
//! Replay outcomes per action:
//! - success → removed from the queue
//! - conflict (server has a newer version) → dropped, logged; the server
//!   copy wins and the queued change is discarded
//! - any other failure → retained for the next drain cycle; the drain
//!   continues with the following action

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::connectivity::{Connectivity, ConnectivityObserver};
use crate::error::{ClientError, ClientResult};
use crate::queue::OfflineQueue;
use shared::models::{CategorySave, CheckoutRequest, OfflineAction, ProductSave, QueuedAction};
use shared::util::now_secs;

/// Server-facing side of the coordinator.
///
/// [`crate::HttpClient`] is the production implementation; tests script a
/// fake. Keeping this a trait keeps the replay logic independent of any
/// HTTP machinery.
#[async_trait::async_trait]
pub trait SyncTransport: Send + Sync {
    async fn checkout(&self, request: &CheckoutRequest) -> ClientResult<()>;
    async fn save_product(&self, save: &ProductSave) -> ClientResult<()>;
    async fn save_category(&self, save: &CategorySave) -> ClientResult<()>;
}

/// What happened to a submitted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Sent to the server and applied
    Applied,
    /// Recorded in the offline queue for later replay
    Queued,
}

/// Result of one drain cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub synced: usize,
    pub conflicts: usize,
    pub retained: usize,
}

/// Coordinates online submission and offline replay for one terminal
#[derive(Clone)]
pub struct SyncCoordinator {
    transport: Arc<dyn SyncTransport>,
    queue: OfflineQueue,
    observer: ConnectivityObserver,
    shutdown: CancellationToken,
}

impl SyncCoordinator {
    pub fn new(
        transport: Arc<dyn SyncTransport>,
        queue: OfflineQueue,
        observer: ConnectivityObserver,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            transport,
            queue,
            observer,
            shutdown,
        }
    }

    pub fn is_online(&self) -> bool {
        self.observer.current().is_online()
    }

    /// Pending actions not yet replayed
    pub fn pending(&self) -> ClientResult<u64> {
        Ok(self.queue.len()?)
    }

    // ========== Submission paths ==========

    pub async fn submit_checkout(&self, request: CheckoutRequest) -> ClientResult<SyncOutcome> {
        self.submit(OfflineAction::Checkout(request)).await
    }

    pub async fn submit_product_save(&self, save: ProductSave) -> ClientResult<SyncOutcome> {
        self.submit(OfflineAction::Product(save)).await
    }

    pub async fn submit_category_save(&self, save: CategorySave) -> ClientResult<SyncOutcome> {
        self.submit(OfflineAction::Category(save)).await
    }

    /// Send when online; queue when offline or when the server cannot be
    /// reached. Server-side rejections (validation, conflict) are not
    /// queueing material and surface to the caller.
    async fn submit(&self, action: OfflineAction) -> ClientResult<SyncOutcome> {
        if !self.is_online() {
            self.enqueue(action)?;
            return Ok(SyncOutcome::Queued);
        }

        match self.send(&action).await {
            Ok(()) => Ok(SyncOutcome::Applied),
            Err(e) if e.is_connectivity() => {
                tracing::warn!(kind = action.kind(), "Server unreachable, queueing action: {e}");
                self.enqueue(action)?;
                Ok(SyncOutcome::Queued)
            }
            Err(e) => Err(e),
        }
    }

    fn enqueue(&self, action: OfflineAction) -> ClientResult<u64> {
        let entry = QueuedAction {
            client_timestamp: now_secs(),
            action,
        };
        let seq = self.queue.push(&entry)?;
        tracing::info!(kind = entry.action.kind(), seq, "Offline: change saved locally");
        Ok(seq)
    }

    // ========== Replay ==========

    async fn send(&self, action: &OfflineAction) -> ClientResult<()> {
        match action {
            OfflineAction::Checkout(request) => self.transport.checkout(request).await,
            OfflineAction::Product(save) => self.transport.save_product(save).await,
            OfflineAction::Category(save) => self.transport.save_category(save).await,
        }
    }

    /// Rebuild the action with `updated_at` pinned to the moment the
    /// operator made the edit, so the server's conflict check compares
    /// against the real edit time rather than the replay time.
    fn stamped(entry: &QueuedAction) -> OfflineAction {
        match &entry.action {
            OfflineAction::Checkout(request) => OfflineAction::Checkout(request.clone()),
            OfflineAction::Product(save) => {
                let mut save = save.clone();
                save.input.updated_at = Some(entry.client_timestamp);
                OfflineAction::Product(save)
            }
            OfflineAction::Category(save) => {
                let mut save = save.clone();
                save.input.updated_at = Some(entry.client_timestamp);
                OfflineAction::Category(save)
            }
        }
    }

    /// Replay the queue sequentially in insertion order.
    pub async fn drain(&self) -> ClientResult<DrainReport> {
        let pending = self.queue.list()?;
        let mut report = DrainReport::default();
        if pending.is_empty() {
            return Ok(report);
        }

        tracing::info!(count = pending.len(), "Syncing offline actions");

        for (seq, entry) in pending {
            let action = Self::stamped(&entry);
            match self.send(&action).await {
                Ok(()) => {
                    self.queue.remove(seq)?;
                    report.synced += 1;
                }
                Err(ClientError::Conflict { .. }) => {
                    // Server wins; the queued change is discarded
                    tracing::warn!(
                        kind = action.kind(),
                        seq,
                        "Conflict detected during sync, skipping client change"
                    );
                    self.queue.remove(seq)?;
                    report.conflicts += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        kind = action.kind(),
                        seq,
                        "Failed to sync action, will retry later: {e}"
                    );
                    report.retained += 1;
                }
            }
        }

        if report.retained == 0 {
            tracing::info!(synced = report.synced, conflicts = report.conflicts, "All offline actions synced");
        } else {
            tracing::warn!(retained = report.retained, "Some offline actions failed to sync");
        }
        Ok(report)
    }

    /// Run the coordinator until shutdown.
    ///
    /// Drains once at startup if already online (the queue may hold
    /// actions from a previous process run), then on every
    /// Offline→Online transition.
    pub async fn run(self) {
        tracing::info!("SyncCoordinator started");

        if self.is_online() {
            if let Err(e) = self.drain().await {
                tracing::error!("Startup drain failed: {e}");
            }
        }

        let mut observer = self.observer.clone();
        let shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("SyncCoordinator shutting down");
                    break;
                }

                change = observer.changed() => {
                    match change {
                        Some(Connectivity::Online) => {
                            tracing::info!("Connectivity restored, draining offline queue");
                            if let Err(e) = self.drain().await {
                                tracing::error!("Offline queue drain failed: {e}");
                            }
                        }
                        Some(Connectivity::Offline) => {
                            tracing::info!("Connectivity lost, mutations will queue locally");
                        }
                        None => break,
                    }
                }
            }
        }

        tracing::info!("SyncCoordinator stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity;
    use shared::models::{CartLine, CategoryInput, ProductInput};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted transport: pops one result per call, records every call.
    /// An exhausted script answers Ok.
    #[derive(Default)]
    struct FakeTransport {
        script: Mutex<VecDeque<ClientResult<()>>>,
        calls: Mutex<Vec<OfflineAction>>,
    }

    impl FakeTransport {
        fn scripted(results: Vec<ClientResult<()>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(results.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn next(&self) -> ClientResult<()> {
            self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }

        fn calls(&self) -> Vec<OfflineAction> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl SyncTransport for FakeTransport {
        async fn checkout(&self, request: &CheckoutRequest) -> ClientResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(OfflineAction::Checkout(request.clone()));
            self.next()
        }

        async fn save_product(&self, save: &ProductSave) -> ClientResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(OfflineAction::Product(save.clone()));
            self.next()
        }

        async fn save_category(&self, save: &CategorySave) -> ClientResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(OfflineAction::Category(save.clone()));
            self.next()
        }
    }

    fn coordinator(
        transport: Arc<FakeTransport>,
        initial: Connectivity,
    ) -> (SyncCoordinator, crate::ConnectivityHandle) {
        let (handle, observer) = connectivity::channel(initial);
        let queue = OfflineQueue::open_in_memory().unwrap();
        let coordinator =
            SyncCoordinator::new(transport, queue, observer, CancellationToken::new());
        (coordinator, handle)
    }

    fn cart() -> CheckoutRequest {
        CheckoutRequest {
            items: vec![CartLine {
                id: 1,
                selected_variant_id: None,
                quantity: 2,
                price: 9.99,
            }],
            total: 19.98,
        }
    }

    fn product_save(id: Option<i64>) -> ProductSave {
        ProductSave {
            id,
            input: ProductInput {
                name: "Mug".to_string(),
                price: 4.0,
                stock: 6,
                category_id: None,
                image_url: None,
                variants: vec![],
                updated_at: None,
            },
        }
    }

    fn category_save(id: Option<i64>) -> CategorySave {
        CategorySave {
            id,
            input: CategoryInput {
                name: "Coffee".to_string(),
                updated_at: None,
            },
        }
    }

    #[tokio::test]
    async fn online_submission_goes_straight_through() {
        let transport = FakeTransport::scripted(vec![]);
        let (coordinator, _handle) = coordinator(transport.clone(), Connectivity::Online);

        let outcome = coordinator.submit_checkout(cart()).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Applied);
        assert_eq!(coordinator.pending().unwrap(), 0);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn offline_submission_is_queued_not_sent() {
        let transport = FakeTransport::scripted(vec![]);
        let (coordinator, _handle) = coordinator(transport.clone(), Connectivity::Offline);

        let outcome = coordinator.submit_checkout(cart()).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Queued);
        assert_eq!(coordinator.pending().unwrap(), 1);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn server_rejection_is_not_queued() {
        // A 400 is a real answer from the server, not a connectivity
        // failure; queueing it would just replay a guaranteed failure
        let transport =
            FakeTransport::scripted(vec![Err(ClientError::Validation("bad cart".into()))]);
        let (coordinator, _handle) = coordinator(transport.clone(), Connectivity::Online);

        let err = coordinator.submit_checkout(cart()).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(coordinator.pending().unwrap(), 0);
    }

    #[tokio::test]
    async fn drain_replays_in_insertion_order_with_client_timestamps() {
        let transport = FakeTransport::scripted(vec![]);
        let (coordinator, _handle) = coordinator(transport.clone(), Connectivity::Offline);

        coordinator
            .submit_product_save(product_save(Some(7)))
            .await
            .unwrap();
        coordinator
            .submit_category_save(category_save(Some(3)))
            .await
            .unwrap();
        let stamps: Vec<i64> = coordinator
            .queue
            .list()
            .unwrap()
            .iter()
            .map(|(_, e)| e.client_timestamp)
            .collect();

        let report = coordinator.drain().await.unwrap();
        assert_eq!(report, DrainReport { synced: 2, conflicts: 0, retained: 0 });
        assert_eq!(coordinator.pending().unwrap(), 0);

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        match &calls[0] {
            OfflineAction::Product(save) => {
                assert_eq!(save.id, Some(7));
                // Replay pins updated_at to the recorded edit time
                assert_eq!(save.input.updated_at, Some(stamps[0]));
            }
            other => panic!("expected product first, got {other:?}"),
        }
        match &calls[1] {
            OfflineAction::Category(save) => {
                assert_eq!(save.input.updated_at, Some(stamps[1]));
            }
            other => panic!("expected category second, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn conflict_during_replay_drops_the_action() {
        let transport = FakeTransport::scripted(vec![Err(ClientError::Conflict {
            current: serde_json::json!({"updated_at": 99999}),
        })]);
        let (coordinator, _handle) = coordinator(transport.clone(), Connectivity::Offline);

        coordinator
            .submit_product_save(product_save(Some(1)))
            .await
            .unwrap();

        let report = coordinator.drain().await.unwrap();
        assert_eq!(report, DrainReport { synced: 0, conflicts: 1, retained: 0 });
        // Dropped, not retried: queue empty and exactly one attempt made
        assert_eq!(coordinator.pending().unwrap(), 0);
        assert_eq!(transport.calls().len(), 1);

        let report = coordinator.drain().await.unwrap();
        assert_eq!(report, DrainReport::default());
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn failure_during_replay_retains_and_continues() {
        // First action fails with a server error, second succeeds: the
        // failed one stays queued, the drain moves on
        let transport = FakeTransport::scripted(vec![
            Err(ClientError::Server("boom".into())),
            Ok(()),
        ]);
        let (coordinator, _handle) = coordinator(transport.clone(), Connectivity::Offline);

        coordinator.submit_checkout(cart()).await.unwrap();
        coordinator
            .submit_category_save(category_save(None))
            .await
            .unwrap();

        let report = coordinator.drain().await.unwrap();
        assert_eq!(report, DrainReport { synced: 1, conflicts: 0, retained: 1 });
        assert_eq!(coordinator.pending().unwrap(), 1);

        // Next cycle retries the retained action
        let report = coordinator.drain().await.unwrap();
        assert_eq!(report, DrainReport { synced: 1, conflicts: 0, retained: 0 });
        assert_eq!(coordinator.pending().unwrap(), 0);
    }

    #[tokio::test]
    async fn run_drains_on_reconnect() {
        let transport = FakeTransport::scripted(vec![]);
        let (coordinator, handle) = coordinator(transport.clone(), Connectivity::Offline);

        coordinator.submit_checkout(cart()).await.unwrap();
        assert_eq!(coordinator.pending().unwrap(), 1);

        let shutdown = coordinator.shutdown.clone();
        let worker = tokio::spawn(coordinator.clone().run());

        handle.set_online();

        // Wait for the worker to observe the transition and drain
        for _ in 0..100 {
            if coordinator.pending().unwrap() == 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(coordinator.pending().unwrap(), 0);
        assert_eq!(transport.calls().len(), 1);

        shutdown.cancel();
        worker.await.unwrap();
    }
}
