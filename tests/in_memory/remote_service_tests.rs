//! In-memory remote service behaviour.

use chrono::{TimeZone, Utc};
use rstest::rstest;
use tasklink::task::{
    adapters::memory::{InMemoryRemoteTaskService, RemoteCall},
    domain::{
        ExportedTask, Importance, ItemBody, RemoteTaskId, TaskListId, TaskStatus,
    },
    ports::{RemoteTaskError, RemoteTaskService},
};

fn exported(title: &str) -> ExportedTask {
    ExportedTask {
        title: title.to_owned(),
        body: None,
        status: None,
        importance: None,
        checklist_items: Vec::new(),
        linked_resources: Vec::new(),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_fills_defaults_and_creation_time() {
    let created_at = Utc
        .with_ymd_and_hms(2025, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let remote = InMemoryRemoteTaskService::new(created_at);
    let list_id = TaskListId::new("inbox").expect("valid list id");
    remote.add_list(&list_id).expect("list should be added");

    let task = remote
        .create_task(&list_id, &exported("buy milk"))
        .await
        .expect("create should succeed");

    assert_eq!(task.title.as_deref(), Some("buy milk"));
    assert_eq!(task.status, Some(TaskStatus::NotStarted));
    assert_eq!(task.importance, Some(Importance::Normal));
    assert_eq!(task.created_date_time, Some(created_at));
    assert_eq!(
        remote.task(&list_id, &task.id).expect("lookup"),
        Some(task.clone())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_patches_only_sent_fields() {
    let remote = InMemoryRemoteTaskService::default();
    let list_id = TaskListId::new("inbox").expect("valid list id");
    remote.add_list(&list_id).expect("list should be added");
    let mut first = exported("buy milk");
    first.body = Some(ItemBody::text("from the corner shop"));
    let created = remote
        .create_task(&list_id, &first)
        .await
        .expect("create should succeed");

    let mut patch = exported("buy oat milk");
    patch.status = Some(TaskStatus::Completed);
    let updated = remote
        .update_task(&list_id, &created.id, &patch)
        .await
        .expect("update should succeed");

    assert_eq!(updated.title.as_deref(), Some("buy oat milk"));
    assert_eq!(updated.status, Some(TaskStatus::Completed));
    assert_eq!(updated.body, Some(ItemBody::text("from the corner shop")));
    assert_eq!(
        remote.calls().expect("calls"),
        vec![
            RemoteCall::Create {
                list_id: list_id.clone(),
                title: "buy milk".to_owned(),
            },
            RemoteCall::Update {
                list_id,
                remote_id: created.id,
            },
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_list_and_task_are_reported() {
    let remote = InMemoryRemoteTaskService::default();
    let missing_list = TaskListId::new("missing").expect("valid list id");
    let list_id = TaskListId::new("inbox").expect("valid list id");
    remote.add_list(&list_id).expect("list should be added");
    let ghost = RemoteTaskId::new("ghost").expect("valid remote id");

    let create = remote.create_task(&missing_list, &exported("x")).await;
    let update = remote.update_task(&list_id, &ghost, &exported("x")).await;

    assert!(matches!(create, Err(RemoteTaskError::ListNotFound(_))));
    assert!(matches!(update, Err(RemoteTaskError::TaskNotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn injected_failures_reject_the_call() {
    let remote = InMemoryRemoteTaskService::default();
    let list_id = TaskListId::new("inbox").expect("valid list id");
    remote.add_list(&list_id).expect("list should be added");
    remote.fail_title("broken").expect("failure should be injected");

    let result = remote.create_task(&list_id, &exported("broken")).await;

    assert!(matches!(result, Err(RemoteTaskError::Rejected(_))));
    assert_eq!(remote.task_count(&list_id).expect("count"), 0);
}
