//! Shared world state for task reconciliation BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use tasklink::task::{
    adapters::memory::{InMemoryIdentityStore, InMemoryRemoteTaskService},
    codec::{DisplayOptions, TaskLineCodec},
    domain::TaskListId,
    services::{ReconciliationService, SelectionReport},
};

/// Service type used by the BDD world.
pub type TestReconciliationService =
    ReconciliationService<InMemoryRemoteTaskService, InMemoryIdentityStore, DefaultClock>;

/// Scenario world for task reconciliation behaviour tests.
pub struct ReconciliationWorld {
    pub service: TestReconciliationService,
    pub remote: InMemoryRemoteTaskService,
    pub store: InMemoryIdentityStore,
    pub list_id: Option<TaskListId>,
    pub last_report: Option<SelectionReport>,
}

impl ReconciliationWorld {
    /// Creates a world with empty adapters and no pushed selection.
    #[must_use]
    pub fn new() -> Self {
        let remote = InMemoryRemoteTaskService::default();
        let store = InMemoryIdentityStore::new();
        let codec =
            TaskLineCodec::new(DisplayOptions::default()).expect("default options are valid");
        let service = ReconciliationService::new(
            Arc::new(remote.clone()),
            Arc::new(store.clone()),
            Arc::new(codec),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            remote,
            store,
            list_id: None,
            last_report: None,
        }
    }

    /// Returns the configured task list.
    pub fn list_id(&self) -> Result<&TaskListId, eyre::Report> {
        self.list_id
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task list in scenario world"))
    }

    /// Returns the report of the last push.
    pub fn report(&self) -> Result<&SelectionReport, eyre::Report> {
        self.last_report
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no selection has been pushed"))
    }
}

impl Default for ReconciliationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReconciliationWorld {
    ReconciliationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
