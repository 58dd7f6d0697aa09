//! When steps for task reconciliation BDD scenarios.

use super::world::{ReconciliationWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#"the line "{line}" from "{document}" is pushed"#)]
fn push_line(
    world: &mut ReconciliationWorld,
    line: String,
    document: String,
) -> Result<(), eyre::Report> {
    let list_id = world.list_id()?.clone();
    let report = run_async(world.service.push_selection(&line, &document, &list_id));
    world.last_report = Some(report);
    Ok(())
}
