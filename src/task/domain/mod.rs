//! Domain model for task line synchronisation.
//!
//! The task domain models the reconciled view of one task (text-derived and
//! remote-derived fields), the identifiers that link a task line to its
//! remote record, and the payloads exchanged with the remote service. All
//! infrastructure concerns stay outside of the domain boundary.

mod error;
mod ids;
mod record;
mod remote;
mod resources;
mod status;

pub use error::{ParseImportanceError, ParseTaskStatusError, TaskDomainError};
pub use ids::{BLOCK_MARKER_PREFIX, BlockMarker, RemoteTaskId, TaskListId};
pub use record::TaskRecord;
pub use remote::{ExportedTask, RemoteTask};
pub use resources::{BodyContentType, ChecklistItem, ItemBody, LinkedResource, TrackingLocator};
pub use status::{Importance, TaskStatus};
