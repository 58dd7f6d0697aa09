//! Given steps for task reconciliation BDD scenarios.

use super::world::ReconciliationWorld;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasklink::task::{
    domain::{BlockMarker, RemoteTask, RemoteTaskId, TaskListId},
    ports::IdentityStore,
};

#[given(r#"a remote task list "{list}""#)]
fn remote_task_list(world: &mut ReconciliationWorld, list: String) -> Result<(), eyre::Report> {
    let list_id = TaskListId::new(list).wrap_err("build task list id")?;
    world.remote.add_list(&list_id).wrap_err("add remote list")?;
    world.list_id = Some(list_id);
    Ok(())
}

#[given(r#"a remote task "{id}" titled "{title}" linked to marker "{marker}""#)]
fn linked_remote_task(
    world: &mut ReconciliationWorld,
    id: String,
    title: String,
    marker: String,
) -> Result<(), eyre::Report> {
    let remote_id = RemoteTaskId::new(id).wrap_err("build remote task id")?;
    let block_marker = BlockMarker::new(marker).wrap_err("build block marker")?;
    let list_id = world.list_id()?.clone();
    world
        .remote
        .insert_task(&list_id, RemoteTask::new(remote_id.clone()).with_title(title))
        .wrap_err("seed remote task")?;
    world
        .store
        .record(&block_marker, &remote_id)
        .wrap_err("seed identity mapping")?;
    Ok(())
}

#[given(r#"the remote service rejects tasks titled "{title}""#)]
fn remote_rejects(world: &mut ReconciliationWorld, title: String) -> Result<(), eyre::Report> {
    world
        .remote
        .fail_title(title)
        .wrap_err("inject remote failure")?;
    Ok(())
}
