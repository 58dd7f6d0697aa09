//! Rendering remote tasks as task lines.

use super::ReconciliationService;
use crate::task::{
    codec::{RenderMode, TaskRenderError},
    domain::{RemoteTask, TaskDomainError, TaskRecord},
    ports::{IdentityStore, IdentityStoreError, RemoteTaskService},
};
use mockable::Clock;
use thiserror::Error;

/// Errors raised while rendering remote tasks.
#[derive(Debug, Clone, Error)]
pub enum RenderRemoteError {
    /// The remote task could not become a record.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The reverse marker lookup failed.
    #[error(transparent)]
    Identity(#[from] IdentityStoreError),
    /// The record could not be rendered.
    #[error(transparent)]
    Render(#[from] TaskRenderError),
}

impl<R, S, C> ReconciliationService<R, S, C>
where
    R: RemoteTaskService + 'static,
    S: IdentityStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Renders remote tasks as task text, one entry per task.
    ///
    /// Tasks already linked to a block marker keep it; no marker is minted
    /// here. A creation date other than today is rendered after the title.
    ///
    /// # Errors
    ///
    /// Returns [`RenderRemoteError`] for the first task that has no title,
    /// whose marker lookup fails or that cannot be rendered.
    pub fn render_remote(
        &self,
        tasks: &[RemoteTask],
        source_document: &str,
        mode: RenderMode,
    ) -> Result<Vec<String>, RenderRemoteError> {
        let today = self.clock.utc().date_naive();
        tasks
            .iter()
            .map(|task| {
                let marker = self.identity.find_marker(&task.id)?;
                let mut record = TaskRecord::from_remote(
                    task,
                    source_document,
                    marker,
                    &self.codec.options().tracking,
                )?;
                record.set_created_on(
                    task.created_date_time
                        .map(|created| created.date_naive())
                        .filter(|created| *created != today),
                );
                Ok(self.codec.serialize(&record, mode)?)
            })
            .collect()
    }
}
