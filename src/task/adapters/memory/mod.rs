//! In-memory adapters for tests and embedding hosts.

mod identity;
mod remote;

pub use identity::InMemoryIdentityStore;
pub use remote::{InMemoryRemoteTaskService, RemoteCall};
