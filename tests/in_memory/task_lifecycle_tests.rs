//! In-memory integration tests for the task lifecycle.

use super::helpers::{TestContext, context};
use rstest::rstest;
use taskboard::task::{
    domain::TaskStatus,
    ports::{Notification, TaskFilter, TaskRepository},
    services::{ErrorKind, UpdateTaskRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_moves_through_its_whole_lifecycle(context: TestContext) {
    let created = context
        .service
        .create_task(
            context
                .request("Book Keynote Speaker")
                .with_assignee(context.user_id.to_string()),
        )
        .await;
    assert_eq!(created.code, 201);
    let task = created.details.expect("created task");
    let task_id = task.id().to_string();

    let fetched = context.service.fetch_task_by_id(&task_id).await;
    assert_eq!(fetched.details.map(|details| details.task), Some(task.clone()));

    let updated = context
        .service
        .update_task(
            &task_id,
            UpdateTaskRequest::new().with_description("Book keynote speaker and panel"),
        )
        .await;
    assert_eq!(updated.code, 200);

    let patched = context
        .service
        .patch_task(&task_id, UpdateTaskRequest::new().with_due_date("2026-12-01"))
        .await;
    assert_eq!(
        patched
            .details
            .map(|details| details.task.due_date().to_canonical_string()),
        Some("2026-12-01T00:00:00.000Z".to_owned())
    );

    let status = context
        .service
        .update_task_status(&task_id, "completed")
        .await;
    assert_eq!(
        status.details.map(|updated| updated.status()),
        Some(TaskStatus::Completed)
    );

    let deleted = context.service.delete_task_from_project(&task_id).await;
    assert_eq!(deleted.code, 200);

    let gone = context.service.fetch_task_by_id(&task_id).await;
    assert_eq!(gone.error_kind(), Some(ErrorKind::NotFound));

    assert_eq!(
        context.dispatcher.sent(),
        vec![
            Notification::new("'book keynote speaker' updated!", context.user_id),
            Notification::new("'book keynote speaker and panel' deleted!", context.user_id),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_delete_notification_does_not_undo_the_delete(context: TestContext) {
    let task = context
        .service
        .create_task(
            context
                .request("Print badges")
                .with_assignee(context.user_id.to_string()),
        )
        .await
        .details
        .expect("created task");
    context.dispatcher.reject_with(500, "notification store offline");

    let envelope = context
        .service
        .delete_task_from_project(&task.id().to_string())
        .await;

    assert_eq!(envelope.code, 200);
    assert_eq!(
        envelope.notification.map(|report| report.code),
        Some(500)
    );
    assert_eq!(
        context.dispatcher.sent(),
        vec![Notification::new("'print badges' deleted!", context.user_id)]
    );
    let stored = context
        .repository
        .find_one(&TaskFilter::by_id(task.id()))
        .await
        .expect("lookup should succeed");
    assert!(stored.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_description_can_be_reused(context: TestContext) {
    let task = context
        .service
        .create_task(context.request("Reserve hall"))
        .await
        .details
        .expect("created task");
    context
        .service
        .delete_task_from_project(&task.id().to_string())
        .await;

    let recreated = context
        .service
        .create_task(context.request("RESERVE HALL"))
        .await;

    assert_eq!(recreated.code, 201);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn envelope_serialises_without_empty_sections(context: TestContext) {
    let envelope = context
        .service
        .update_task_status("missing-id", "done")
        .await;

    let json = serde_json::to_value(&envelope).expect("envelope should serialise");

    assert_eq!(json["code"], 400);
    assert_eq!(json["error"]["kind"], "invalid_argument");
    assert!(json.get("details").is_none());
    assert!(json.get("notification").is_none());
}
