//! Tasklink: Markdown task lines kept in step with a remote task service.
//!
//! This crate parses task lines from Markdown notes into structured task
//! records, renders records back into canonical task lines, and reconciles
//! batches of records with a remote task service. A short block marker
//! appended to each line is the only durable link between the text and the
//! remote record.
//!
//! # Architecture
//!
//! Tasklink follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, file-backed)
//!
//! # Modules
//!
//! - [`task`]: Task line codec, identity store and reconciliation

pub mod task;
