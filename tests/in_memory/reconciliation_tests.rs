//! End-to-end reconciliation over in-memory adapters.

use super::helpers::{InMemoryHarness, harness};
use rstest::rstest;
use tasklink::task::{
    codec::RenderMode,
    domain::{Importance, TaskStatus},
    ports::IdentityLookup,
    services::{ReconcileOutcome, SelectionLine},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_push_of_a_rendered_line_updates_instead_of_creating(
    harness: InMemoryHarness,
) -> Result<(), eyre::Report> {
    let first = harness
        .service
        .push_selection("- [ ] book dentist ⏫", "Health.md", &harness.list_id)
        .await;
    let rendered = first.replacement_text(harness.service.codec(), RenderMode::SingleLine);
    let ticked = rendered.replacen("- [ ]", "- [x]", 1);

    let second = harness
        .service
        .push_selection(&ticked, "Health.md", &harness.list_id)
        .await;

    let [SelectionLine::Reconciled { task, .. }] = second.lines() else {
        eyre::bail!("expected one reconciled line, got {:?}", second.lines());
    };
    eyre::ensure!(
        matches!(task.outcome, ReconcileOutcome::Updated),
        "second push should update, got {:?}",
        task.outcome
    );
    eyre::ensure!(harness.remote.task_count(&harness.list_id)? == 1, "no duplicate task");
    let remote_id = task
        .record
        .remote_id()
        .ok_or_else(|| eyre::eyre!("record should be linked"))?;
    let stored = harness
        .remote
        .task(&harness.list_id, remote_id)?
        .ok_or_else(|| eyre::eyre!("remote task should exist"))?;
    eyre::ensure!(stored.status == Some(TaskStatus::Completed), "status pushed");
    eyre::ensure!(stored.importance == Some(Importance::High), "importance pushed");
    eyre::ensure!(
        second.replacement_text(harness.service.codec(), RenderMode::SingleLine) == ticked,
        "rendered text should be stable"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reconciled_records_carry_a_tracking_link_to_their_marker(
    harness: InMemoryHarness,
) -> Result<(), eyre::Report> {
    let record = harness.service.parse_line("water plants", "Home/Garden.md")?;

    let reconciled = harness
        .service
        .reconcile_one(record, &harness.list_id)
        .await;

    let marker = reconciled
        .record
        .local_token()
        .ok_or_else(|| eyre::eyre!("marker should be minted"))?;
    let link = reconciled
        .record
        .linked_resources()
        .first()
        .ok_or_else(|| eyre::eyre!("tracking link should be attached"))?;
    eyre::ensure!(
        link.web_url.ends_with(&format!(
            "?vault=vault&filepath=Home%2FGarden.md&block={marker}"
        )),
        "unexpected link {}",
        link.web_url
    );
    eyre::ensure!(
        harness.store.lookup(marker)?.as_ref() == reconciled.record.remote_id(),
        "store should map the marker"
    );
    Ok(())
}
