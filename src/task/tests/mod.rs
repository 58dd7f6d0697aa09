//! Unit tests for the task module.
//!
//! Tests are organised by component: the line grammar, parser and
//! serializer, the task record, and the reconciliation services.
