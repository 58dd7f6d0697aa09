//! Application services for task line reconciliation.

mod reconcile;
mod render;
mod selection;

pub use reconcile::{
    BatchReport, ReconcileFailure, ReconcileOutcome, ReconciledTask, ReconciliationService,
};
pub use render::RenderRemoteError;
pub use selection::{SelectionLine, SelectionReport};
