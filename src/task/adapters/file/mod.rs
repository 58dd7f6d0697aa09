//! File-backed adapters.

mod identity;

pub use identity::FileIdentityStore;
