//! Task line synchronisation for Tasklink.
//!
//! This module keeps a Markdown task line and a remote task record consistent
//! across edits on either side: parsing lines into structured records,
//! rendering records back into canonical text, and reconciling records with
//! the remote task service through block-marker identities. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Line grammar, parser and serializer in [`codec`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod codec;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
