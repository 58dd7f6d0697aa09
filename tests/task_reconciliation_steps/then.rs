//! Then steps for task reconciliation BDD scenarios.

use super::world::ReconciliationWorld;
use rstest_bdd_macros::then;
use tasklink::task::{
    codec::RenderMode,
    domain::{RemoteTaskId, TaskStatus},
    ports::IdentityLookup,
    services::SelectionLine,
};

fn replacement(world: &ReconciliationWorld) -> Result<String, eyre::Report> {
    Ok(world
        .report()?
        .replacement_text(world.service.codec(), RenderMode::SingleLine))
}

#[then(r#"the replacement text is "{expected}""#)]
fn replacement_is(world: &ReconciliationWorld, expected: String) -> Result<(), eyre::Report> {
    let actual = replacement(world)?;
    eyre::ensure!(actual == expected, "expected {expected:?}, found {actual:?}");
    Ok(())
}

#[then(r#"the replacement text starts with "{prefix}""#)]
fn replacement_starts_with(
    world: &ReconciliationWorld,
    prefix: String,
) -> Result<(), eyre::Report> {
    let actual = replacement(world)?;
    eyre::ensure!(
        actual.starts_with(&prefix),
        "expected {actual:?} to start with {prefix:?}"
    );
    Ok(())
}

#[then(r#"the replacement text does not contain "{fragment}""#)]
fn replacement_lacks(world: &ReconciliationWorld, fragment: String) -> Result<(), eyre::Report> {
    let actual = replacement(world)?;
    eyre::ensure!(
        !actual.contains(&fragment),
        "expected {actual:?} not to contain {fragment:?}"
    );
    Ok(())
}

#[then("the identity store maps the new marker to the created remote task")]
fn store_maps_new_marker(world: &ReconciliationWorld) -> Result<(), eyre::Report> {
    let report = world.report()?;
    let Some(SelectionLine::Reconciled { task, .. }) = report.lines().first() else {
        eyre::bail!("expected a reconciled line");
    };
    let marker = task
        .record
        .local_token()
        .ok_or_else(|| eyre::eyre!("record has no block marker"))?;
    let mapped = world.store.lookup(marker)?;
    eyre::ensure!(
        mapped.as_ref() == task.record.remote_id(),
        "store maps {marker} to {mapped:?}"
    );
    Ok(())
}

#[then(r#"the remote task "{id}" is completed"#)]
fn remote_task_completed(world: &ReconciliationWorld, id: String) -> Result<(), eyre::Report> {
    let remote_id = RemoteTaskId::new(id)?;
    let stored = world
        .remote
        .task(world.list_id()?, &remote_id)?
        .ok_or_else(|| eyre::eyre!("remote task {remote_id} is missing"))?;
    eyre::ensure!(
        stored.status == Some(TaskStatus::Completed),
        "expected completed, found {:?}",
        stored.status
    );
    Ok(())
}

#[then("the remote list task count is {count:usize}")]
fn remote_task_count(world: &ReconciliationWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.remote.task_count(world.list_id()?)?;
    eyre::ensure!(actual == count, "expected {count} tasks, found {actual}");
    Ok(())
}

#[then("the number of failed lines is {count:usize}")]
fn failed_lines(world: &ReconciliationWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.report()?.failed_count();
    eyre::ensure!(actual == count, "expected {count} failed lines, found {actual}");
    Ok(())
}
