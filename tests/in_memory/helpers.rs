//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use tasklink::task::{
    adapters::memory::{InMemoryIdentityStore, InMemoryRemoteTaskService},
    codec::{DisplayOptions, TaskLineCodec},
    domain::TaskListId,
    services::ReconciliationService,
};

/// Service type wired to in-memory adapters.
pub type TestService =
    ReconciliationService<InMemoryRemoteTaskService, InMemoryIdentityStore, DefaultClock>;

/// Service together with handles on its adapters.
pub struct InMemoryHarness {
    pub service: TestService,
    pub remote: InMemoryRemoteTaskService,
    pub store: InMemoryIdentityStore,
    pub list_id: TaskListId,
}

/// Builds a service over an empty store and a remote service with one list.
#[fixture]
pub fn harness() -> InMemoryHarness {
    let list_id = TaskListId::new("inbox").expect("valid list id");
    let remote = InMemoryRemoteTaskService::default();
    remote.add_list(&list_id).expect("list should be added");
    let store = InMemoryIdentityStore::new();
    let codec = TaskLineCodec::new(DisplayOptions::default()).expect("default options are valid");
    let service = ReconciliationService::new(
        Arc::new(remote.clone()),
        Arc::new(store.clone()),
        Arc::new(codec),
        Arc::new(DefaultClock),
    );
    InMemoryHarness {
        service,
        remote,
        store,
        list_id,
    }
}
