//! When steps for task notification BDD scenarios.

use super::world::{TaskNotificationWorld, run_async};
use rstest_bdd_macros::when;
use taskboard::task::services::{CreateTaskRequest, Envelope, UpdateTaskRequest};

fn record<T>(world: &mut TaskNotificationWorld, envelope: &Envelope<T>) {
    world.last_code = Some(envelope.code);
    world.last_error_kind = envelope.error_kind();
    world.last_notification = envelope.notification.clone();
}

#[when(r#"the task description is updated to "{description}""#)]
fn update_description(
    world: &mut TaskNotificationWorld,
    description: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().to_string();
    let envelope = run_async(world.service.update_task(
        &task_id,
        UpdateTaskRequest::new().with_description(description),
    ));
    record(world, &envelope);
    Ok(())
}

#[when("the task is deleted")]
fn delete_task(world: &mut TaskNotificationWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().to_string();
    let envelope = run_async(world.service.delete_task_from_project(&task_id));
    record(world, &envelope);
    Ok(())
}

#[when(r#"the task status is set to "{status}""#)]
fn set_status(world: &mut TaskNotificationWorld, status: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().to_string();
    let envelope = run_async(world.service.update_task_status(&task_id, &status));
    record(world, &envelope);
    Ok(())
}

#[when(r#"another task "{description}" is created"#)]
fn create_another(
    world: &mut TaskNotificationWorld,
    description: String,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(
        description,
        "in-progress",
        "2026-12-31",
        world.project_id()?.to_string(),
    );
    let envelope = run_async(world.service.create_task(request));
    record(world, &envelope);
    Ok(())
}
