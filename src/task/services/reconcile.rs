//! Reconciliation of parsed task records with the remote task service.

use crate::task::{
    codec::{TaskLineCodec, TaskParseError},
    domain::{BlockMarker, RemoteTaskId, TaskDomainError, TaskListId, TaskRecord},
    ports::{IdentityStore, IdentityStoreError, RemoteTaskError, RemoteTaskService},
};
use mockable::Clock;
use rand::Rng;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Number of random characters between the prefix and the sequence of a
/// minted block marker.
const SALT_LENGTH: usize = 4;

/// Radix of the salt characters.
const SALT_RADIX: u32 = 20;

/// Reason a record could not be reconciled.
#[derive(Debug, Clone, Error)]
pub enum ReconcileFailure {
    /// The remote call failed.
    #[error(transparent)]
    Remote(#[from] RemoteTaskError),
    /// The remote task was created but its identity could not be recorded.
    #[error(transparent)]
    Identity(#[from] IdentityStoreError),
    /// A minted marker or returned identifier was invalid.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The reconciliation task stopped before reporting.
    #[error("reconciliation aborted: {0}")]
    Aborted(String),
}

/// Result of reconciling one record.
#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    /// A remote task was created and a new block marker minted.
    Created,
    /// The remote task was updated and its fields merged back.
    Updated,
    /// The record is returned as submitted, with the reason.
    Failed(ReconcileFailure),
}

impl ReconcileOutcome {
    /// Returns `true` for [`ReconcileOutcome::Failed`].
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// A record paired with the outcome of its reconciliation.
#[derive(Debug, Clone)]
pub struct ReconciledTask {
    /// The reconciled record, or the submitted record on failure.
    pub record: TaskRecord,
    /// What happened.
    pub outcome: ReconcileOutcome,
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    results: Vec<ReconciledTask>,
}

impl BatchReport {
    /// Returns the per-record results in input order.
    #[must_use]
    pub fn results(&self) -> &[ReconciledTask] {
        &self.results
    }

    /// Consumes the report and returns the per-record results.
    #[must_use]
    pub fn into_results(self) -> Vec<ReconciledTask> {
        self.results
    }

    /// Returns the number of failed records.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(ReconcileOutcome::is_failure)
    }

    /// Returns the number of created remote tasks.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, ReconcileOutcome::Created))
    }

    /// Returns the number of updated remote tasks.
    #[must_use]
    pub fn updated_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, ReconcileOutcome::Updated))
    }

    /// Returns `true` when no record failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    fn count(&self, predicate: impl Fn(&ReconcileOutcome) -> bool) -> usize {
        self.results
            .iter()
            .filter(|result| predicate(&result.outcome))
            .count()
    }
}

/// Reconciles task records with the remote service and mints block markers.
pub struct ReconciliationService<R, S, C>
where
    R: RemoteTaskService + 'static,
    S: IdentityStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub(super) remote: Arc<R>,
    pub(super) identity: Arc<S>,
    pub(super) codec: Arc<TaskLineCodec>,
    pub(super) clock: Arc<C>,
    minting: Arc<Mutex<()>>,
}

impl<R, S, C> Clone for ReconciliationService<R, S, C>
where
    R: RemoteTaskService + 'static,
    S: IdentityStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            identity: Arc::clone(&self.identity),
            codec: Arc::clone(&self.codec),
            clock: Arc::clone(&self.clock),
            minting: Arc::clone(&self.minting),
        }
    }
}

impl<R, S, C> ReconciliationService<R, S, C>
where
    R: RemoteTaskService + 'static,
    S: IdentityStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a reconciliation service.
    #[must_use]
    pub fn new(remote: Arc<R>, identity: Arc<S>, codec: Arc<TaskLineCodec>, clock: Arc<C>) -> Self {
        Self {
            remote,
            identity,
            codec,
            clock,
            minting: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the codec used to parse and render lines.
    #[must_use]
    pub fn codec(&self) -> &TaskLineCodec {
        &self.codec
    }

    /// Parses a line against this service's identity store.
    ///
    /// # Errors
    ///
    /// Returns [`TaskParseError`] when the line has no title or the identity
    /// lookup fails.
    pub fn parse_line(
        &self,
        raw: &str,
        source_document: &str,
    ) -> Result<TaskRecord, TaskParseError> {
        self.codec.parse_line(raw, source_document, &*self.identity)
    }

    /// Reconciles a batch of records concurrently.
    ///
    /// Each record runs as its own task; a failure never affects the other
    /// records and no remote call is rolled back. Results come back in input
    /// order whatever order the remote calls finish in.
    pub async fn reconcile(&self, records: Vec<TaskRecord>, list_id: &TaskListId) -> BatchReport {
        let submitted = records.clone();
        let mut tasks = JoinSet::new();
        for (index, record) in records.into_iter().enumerate() {
            let service = self.clone();
            let list = list_id.clone();
            tasks.spawn(async move { (index, service.reconcile_one(record, &list).await) });
        }

        let mut slots: Vec<Option<ReconciledTask>> = submitted.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, reconciled) = match joined {
                Ok(done) => done,
                Err(err) => {
                    warn!(error = %err, "reconciliation task did not complete");
                    continue;
                }
            };
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(reconciled);
            }
        }

        let results = slots
            .into_iter()
            .zip(submitted)
            .map(|(slot, record)| {
                slot.unwrap_or_else(|| ReconciledTask {
                    record,
                    outcome: ReconcileOutcome::Failed(ReconcileFailure::Aborted(
                        "task panicked or was cancelled".to_owned(),
                    )),
                })
            })
            .collect();
        BatchReport { results }
    }

    /// Reconciles a single record.
    ///
    /// A record with a resolved remote identifier is updated; any other
    /// record is created and given a freshly minted block marker. On failure
    /// the submitted record is returned unchanged.
    pub async fn reconcile_one(&self, record: TaskRecord, list_id: &TaskListId) -> ReconciledTask {
        let mut working = record.clone();
        let attempt = if working.remote_id().is_some() {
            self.update(&mut working, list_id).await
        } else {
            self.create(&mut working, list_id).await
        };
        match attempt {
            Ok(outcome) => ReconciledTask {
                record: working,
                outcome,
            },
            Err(failure) => {
                warn!(title = record.title(), error = %failure, "task reconciliation failed");
                ReconciledTask {
                    record,
                    outcome: ReconcileOutcome::Failed(failure),
                }
            }
        }
    }

    async fn update(
        &self,
        record: &mut TaskRecord,
        list_id: &TaskListId,
    ) -> Result<ReconcileOutcome, ReconcileFailure> {
        let remote_id = record
            .remote_id()
            .cloned()
            .ok_or(TaskDomainError::EmptyRemoteTaskId)?;
        let returned = self
            .remote
            .update_task(list_id, &remote_id, &record.export(false))
            .await?;
        record.update_from_remote(&returned);
        info!(title = record.title(), remote_id = %remote_id, "updated remote task");
        Ok(ReconcileOutcome::Updated)
    }

    async fn create(
        &self,
        record: &mut TaskRecord,
        list_id: &TaskListId,
    ) -> Result<ReconcileOutcome, ReconcileFailure> {
        if let Some(stale) = record.local_token() {
            warn!(
                title = record.title(),
                marker = %stale,
                "block marker has no remote mapping; creating a new remote task"
            );
        }
        let returned = self.remote.create_task(list_id, &record.export(true)).await?;
        if let Some(status) = returned.status {
            record.set_status(status);
        }
        let marker = self.mint_identity(&returned.id)?;
        record.stamp_identity(marker, returned.id.clone());
        record.attach_tracking_resource(&self.codec.options().tracking);
        info!(
            title = record.title(),
            remote_id = %returned.id,
            marker = record.local_token().map(BlockMarker::as_str),
            "created remote task"
        );
        Ok(ReconcileOutcome::Created)
    }

    /// Allocates a block marker for `remote_id`, records the mapping and
    /// flushes the store.
    ///
    /// Only one caller runs this section at a time, so the sequence and the
    /// table never interleave between records.
    fn mint_identity(&self, remote_id: &RemoteTaskId) -> Result<BlockMarker, ReconcileFailure> {
        let _guard = self.minting.lock().map_err(|err| {
            IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let sequence = self.identity.next_sequence()?;
        let marker = BlockMarker::mint(&random_salt(), sequence)?;
        self.identity.record(&marker, remote_id)?;
        self.identity.persist()?;
        Ok(marker)
    }
}

fn random_salt() -> String {
    let mut rng = rand::thread_rng();
    (0..SALT_LENGTH)
        .filter_map(|_| char::from_digit(rng.gen_range(0..SALT_RADIX), SALT_RADIX))
        .collect()
}
