//! Sync orchestration.
//!
//! Drains the pending portion of the ledger through the submission gateway
//! and owns the author-time publish flow (direct submission with fallback to
//! the offline queue). At most one sync run is in flight at a time; a
//! concurrent call returns an empty report instead of interleaving ledger
//! mutations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::connectivity::ConnectivityObserver;
use crate::error::{Error, Result};
use crate::gateway::StoryGateway;
use crate::ledger::StoryLedger;
use crate::models::{NewStory, RemoteStoryId, StoryDraft, SyncReport};
use crate::store::SnapshotStore;

/// Result of an author-time publish attempt
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// The remote service accepted the story directly
    Published(RemoteStoryId),
    /// The story was queued as a pending draft for a later sync run
    Queued(StoryDraft),
}

struct Inner<S: SnapshotStore> {
    ledger: Arc<StoryLedger<S>>,
    gateway: Arc<dyn StoryGateway>,
    observer: ConnectivityObserver,
    running: AtomicBool,
}

/// Coordinates the ledger, the connectivity observer, and the gateway
pub struct SyncOrchestrator<S: SnapshotStore> {
    inner: Arc<Inner<S>>,
}

impl<S: SnapshotStore> Clone for SyncOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: SnapshotStore + 'static> SyncOrchestrator<S> {
    #[must_use]
    pub fn new(
        ledger: Arc<StoryLedger<S>>,
        gateway: Arc<dyn StoryGateway>,
        observer: ConnectivityObserver,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                ledger,
                gateway,
                observer,
                running: AtomicBool::new(false),
            }),
        }
    }

    /// Publish a story now if the platform reports connectivity, otherwise
    /// (or when the direct attempt fails) queue it as a pending draft.
    ///
    /// Only validation and ledger persistence failures surface to the
    /// caller; a failing direct submission resolves silently into a queued
    /// draft.
    pub async fn publish(&self, story: NewStory) -> Result<PublishOutcome> {
        if story.description.trim().is_empty() {
            return Err(Error::Validation(
                "Story description must not be empty".to_string(),
            ));
        }
        if story.photo.is_empty() {
            return Err(Error::Validation(
                "Story photo must carry image data".to_string(),
            ));
        }

        if self.inner.observer.is_online() {
            match self
                .inner
                .gateway
                .submit(&story.description, &story.photo, story.lat, story.lon)
                .await
            {
                Ok(remote_id) => return Ok(PublishOutcome::Published(remote_id)),
                Err(error) => {
                    tracing::warn!("direct submission failed, queuing story: {error}");
                }
            }
        }

        let draft = self.inner.ledger.append(story)?;
        tracing::info!(draft_id = %draft.id, "story queued for later sync");
        Ok(PublishOutcome::Queued(draft))
    }

    /// Drain the drafts that were pending when the call started.
    ///
    /// The batch is captured once at entry; drafts appended during the run
    /// belong to the next run. Entries are submitted sequentially in ledger
    /// order, and one failing entry never blocks the rest. When a run is
    /// already in flight this returns `{attempted: 0, succeeded: 0}` without
    /// touching the ledger.
    pub async fn sync_pending(&self) -> SyncReport {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            tracing::debug!("sync run already in flight, skipping");
            return SyncReport::default();
        }

        let report = self.drain_batch().await;
        self.inner.running.store(false, Ordering::SeqCst);
        report
    }

    async fn drain_batch(&self) -> SyncReport {
        let batch = self.inner.ledger.list_pending();
        let mut report = SyncReport {
            attempted: batch.len(),
            succeeded: 0,
        };

        for draft in batch {
            match self
                .inner
                .gateway
                .submit(&draft.description, &draft.photo, draft.lat, draft.lon)
                .await
            {
                Ok(remote_id) => {
                    report.succeeded += 1;
                    if let Err(error) = self.inner.ledger.mark_synced(draft.id) {
                        // Remote accepted the story; leaving the entry pending
                        // means it may be submitted again next run
                        tracing::warn!(
                            draft_id = %draft.id,
                            %remote_id,
                            "accepted story could not be marked synced: {error}"
                        );
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        draft_id = %draft.id,
                        "story submission failed, leaving pending: {error}"
                    );
                }
            }
        }

        report
    }

    /// Register the became-online trigger on the observer.
    ///
    /// Each triggered run executes as a spawned task; its report is
    /// delivered on the returned channel so callers can await completion
    /// instead of relying on log output. Must be called within a tokio
    /// runtime.
    pub fn attach_auto_sync(&self) -> mpsc::UnboundedReceiver<SyncReport> {
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        let orchestrator = self.clone();
        self.inner.observer.on_became_online(move || {
            let orchestrator = orchestrator.clone();
            let report_tx = report_tx.clone();
            tokio::spawn(async move {
                tracing::info!("back online, syncing offline stories");
                let report = orchestrator.sync_pending().await;
                tracing::info!(
                    attempted = report.attempted,
                    succeeded = report.succeeded,
                    "auto sync finished"
                );
                let _ = report_tx.send(report);
            });
        });
        report_rx
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tokio::sync::Semaphore;
    use tokio::task::yield_now;

    use super::*;
    use crate::connectivity::ConnectivityHandle;
    use crate::models::PhotoBlob;
    use crate::store::MemorySnapshotStore;

    fn story(description: &str) -> NewStory {
        NewStory::new(
            description,
            PhotoBlob::new("photo.jpg", "image/jpeg", vec![1, 2, 3]),
        )
    }

    /// Gateway stub: fails submissions whose description contains "fail",
    /// optionally waits on a semaphore, optionally appends to a ledger on
    /// its first call
    struct FakeGateway {
        calls: AtomicUsize,
        gate: Option<Arc<Semaphore>>,
        append_on_first_call: Option<Arc<StoryLedger<Arc<MemorySnapshotStore>>>>,
    }

    impl FakeGateway {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                append_on_first_call: None,
            }
        }
    }

    #[async_trait]
    impl StoryGateway for FakeGateway {
        async fn submit(
            &self,
            description: &str,
            _photo: &PhotoBlob,
            _lat: Option<f64>,
            _lon: Option<f64>,
        ) -> Result<RemoteStoryId> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                if let Some(ledger) = &self.append_on_first_call {
                    ledger.append(story("late arrival")).unwrap();
                }
            }
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await.unwrap();
            }
            if description.contains("fail") {
                return Err(Error::Remote {
                    status: 500,
                    message: "server rejected the story".to_string(),
                });
            }
            Ok(RemoteStoryId(format!("remote-{call}")))
        }
    }

    struct Fixture {
        ledger: Arc<StoryLedger<Arc<MemorySnapshotStore>>>,
        gateway: Arc<FakeGateway>,
        orchestrator: SyncOrchestrator<Arc<MemorySnapshotStore>>,
        handle: ConnectivityHandle,
        store: Arc<MemorySnapshotStore>,
    }

    fn setup(online: bool, gateway: FakeGateway) -> Fixture {
        let store = Arc::new(MemorySnapshotStore::new());
        let ledger = Arc::new(StoryLedger::open(Arc::clone(&store)).unwrap());
        let gateway = Arc::new(gateway);
        let (observer, handle) = ConnectivityObserver::new(online);
        let orchestrator = SyncOrchestrator::new(
            Arc::clone(&ledger),
            Arc::clone(&gateway) as Arc<dyn StoryGateway>,
            observer,
        );
        Fixture {
            ledger,
            gateway,
            orchestrator,
            handle,
            store,
        }
    }

    #[tokio::test]
    async fn empty_queue_sync_is_a_noop_without_gateway_calls() {
        let fixture = setup(true, FakeGateway::new());

        let report = fixture.orchestrator.sync_pending().await;
        assert_eq!(report, SyncReport::default());
        assert_eq!(fixture.gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn partial_failure_isolates_entries() {
        let fixture = setup(false, FakeGateway::new());
        let failing = fixture.ledger.append(story("this will fail")).unwrap();
        let passing = fixture.ledger.append(story("this will pass")).unwrap();

        let report = fixture.orchestrator.sync_pending().await;
        assert_eq!(
            report,
            SyncReport {
                attempted: 2,
                succeeded: 1
            }
        );

        let all = fixture.ledger.list_all();
        assert!(!all.iter().find(|d| d.id == failing.id).unwrap().synced);
        assert!(all.iter().find(|d| d.id == passing.id).unwrap().synced);
    }

    #[tokio::test]
    async fn drafts_appended_mid_run_belong_to_the_next_run() {
        let store = Arc::new(MemorySnapshotStore::new());
        let ledger = Arc::new(StoryLedger::open(Arc::clone(&store)).unwrap());
        let gateway = Arc::new(FakeGateway {
            calls: AtomicUsize::new(0),
            gate: None,
            append_on_first_call: Some(Arc::clone(&ledger)),
        });
        let (observer, _handle) = ConnectivityObserver::new(true);
        let orchestrator = SyncOrchestrator::new(
            Arc::clone(&ledger),
            Arc::clone(&gateway) as Arc<dyn StoryGateway>,
            observer,
        );

        ledger.append(story("original")).unwrap();

        let first = orchestrator.sync_pending().await;
        assert_eq!(
            first,
            SyncReport {
                attempted: 1,
                succeeded: 1
            }
        );
        assert_eq!(ledger.pending_count(), 1);

        let second = orchestrator.sync_pending().await;
        assert_eq!(
            second,
            SyncReport {
                attempted: 1,
                succeeded: 1
            }
        );
        assert_eq!(ledger.pending_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_sync_returns_empty_report_without_mutating_the_ledger() {
        let gate = Arc::new(Semaphore::new(0));
        let mut gateway = FakeGateway::new();
        gateway.gate = Some(Arc::clone(&gate));
        let fixture = setup(true, gateway);
        fixture.ledger.append(story("blocked")).unwrap();

        let first = {
            let orchestrator = fixture.orchestrator.clone();
            tokio::spawn(async move { orchestrator.sync_pending().await })
        };

        // Let the first run reach the gateway and park on the gate
        let mut spins = 0;
        while fixture.gateway.calls.load(Ordering::SeqCst) == 0 && spins < 1000 {
            yield_now().await;
            spins += 1;
        }
        assert_eq!(fixture.gateway.calls.load(Ordering::SeqCst), 1);

        let second = fixture.orchestrator.sync_pending().await;
        assert_eq!(second, SyncReport::default());
        assert_eq!(fixture.ledger.pending_count(), 1);

        gate.add_permits(1);
        let first = first.await.unwrap();
        assert_eq!(
            first,
            SyncReport {
                attempted: 1,
                succeeded: 1
            }
        );
        assert_eq!(fixture.ledger.pending_count(), 0);
    }

    #[tokio::test]
    async fn mark_failure_after_remote_success_leaves_entry_pending() {
        let fixture = setup(false, FakeGateway::new());
        fixture.ledger.append(story("accepted remotely")).unwrap();

        fixture.store.fail_saves(true);
        let report = fixture.orchestrator.sync_pending().await;

        // Remote accepted the story, but it stays pending locally
        // (at-least-once delivery, next run may submit it again)
        assert_eq!(
            report,
            SyncReport {
                attempted: 1,
                succeeded: 1
            }
        );
        assert_eq!(fixture.ledger.pending_count(), 1);
    }

    #[tokio::test]
    async fn publish_queues_when_offline() {
        let fixture = setup(false, FakeGateway::new());

        let outcome = fixture.orchestrator.publish(story("written offline")).await.unwrap();
        assert!(matches!(outcome, PublishOutcome::Queued(_)));
        assert_eq!(fixture.gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fixture.ledger.pending_count(), 1);
    }

    #[tokio::test]
    async fn publish_submits_directly_when_online() {
        let fixture = setup(true, FakeGateway::new());

        let outcome = fixture.orchestrator.publish(story("written online")).await.unwrap();
        assert!(matches!(outcome, PublishOutcome::Published(_)));
        assert_eq!(fixture.ledger.pending_count(), 0);
    }

    #[tokio::test]
    async fn publish_falls_back_to_queue_on_direct_failure() {
        let fixture = setup(true, FakeGateway::new());

        let outcome = fixture
            .orchestrator
            .publish(story("this will fail directly"))
            .await
            .unwrap();
        assert!(matches!(outcome, PublishOutcome::Queued(_)));
        assert_eq!(fixture.ledger.pending_count(), 1);
    }

    #[tokio::test]
    async fn publish_rejects_empty_description() {
        let fixture = setup(true, FakeGateway::new());

        let error = fixture.orchestrator.publish(story("   ")).await.unwrap_err();
        assert!(matches!(error, Error::Validation(_)));
        assert_eq!(fixture.ledger.pending_count(), 0);
    }

    #[tokio::test]
    async fn online_transition_triggers_a_sync_run() {
        let fixture = setup(false, FakeGateway::new());
        fixture.ledger.append(story("waiting for signal")).unwrap();

        let mut reports = fixture.orchestrator.attach_auto_sync();
        fixture.handle.set_online(true);

        let report = reports.recv().await.unwrap();
        assert_eq!(
            report,
            SyncReport {
                attempted: 1,
                succeeded: 1
            }
        );
        assert_eq!(fixture.ledger.pending_count(), 0);
    }
}
