//! Port contracts for task line synchronisation.
//!
//! Ports define infrastructure-agnostic interfaces used by the codec and the
//! reconciliation services.

pub mod identity;
pub mod remote;

pub use identity::{
    IdentityLookup, IdentitySnapshot, IdentityStore, IdentityStoreError, IdentityStoreResult,
};
pub use remote::{RemoteTaskError, RemoteTaskResult, RemoteTaskService};
