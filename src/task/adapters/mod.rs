//! Adapter implementations for task line synchronisation ports.

pub mod file;
pub mod memory;
