//! Then steps for task notification BDD scenarios.

use super::world::{TaskNotificationWorld, run_async};
use rstest_bdd_macros::then;
use taskboard::task::{
    ports::{Notification, TaskFilter, TaskRepository},
    services::{ErrorKind, NotificationStatus},
};

#[then("the response code is {code:u16}")]
fn response_code_is(world: &TaskNotificationWorld, code: u16) -> Result<(), eyre::Report> {
    match world.last_code {
        Some(actual) if actual == code => Ok(()),
        other => Err(eyre::eyre!("expected code {code}, found {other:?}")),
    }
}

#[then(r#""{user}" is notified with "{message}""#)]
fn user_is_notified(
    world: &TaskNotificationWorld,
    user: String,
    message: String,
) -> Result<(), eyre::Report> {
    let expected = Notification::new(message, world.user_id(&user)?);
    let sent = world.dispatcher.sent();
    if sent != [expected.clone()] {
        return Err(eyre::eyre!("expected {expected:?}, dispatcher saw {sent:?}"));
    }
    Ok(())
}

#[then("nobody is notified")]
fn nobody_is_notified(world: &TaskNotificationWorld) -> Result<(), eyre::Report> {
    let sent = world.dispatcher.sent();
    if !sent.is_empty() || world.last_notification.is_some() {
        return Err(eyre::eyre!("expected no notifications, dispatcher saw {sent:?}"));
    }
    Ok(())
}

#[then("the notification report failed with code {code:u16}")]
fn notification_failed(world: &TaskNotificationWorld, code: u16) -> Result<(), eyre::Report> {
    let report = world
        .last_notification
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing notification report"))?;
    if report.status != NotificationStatus::Failed || report.code != code {
        return Err(eyre::eyre!("expected failed report with code {code}, got {report:?}"));
    }
    Ok(())
}

#[then("the task no longer exists")]
fn task_no_longer_exists(world: &TaskNotificationWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let stored = run_async(world.repository.find_one(&TaskFilter::by_id(task_id)))?;
    if let Some(task) = stored {
        return Err(eyre::eyre!("task should have been deleted, found {task:?}"));
    }
    Ok(())
}

#[then(r#"the error kind is "{kind}""#)]
fn error_kind_is(world: &TaskNotificationWorld, kind: String) -> Result<(), eyre::Report> {
    let expected: ErrorKind = serde_json::from_value(serde_json::Value::String(kind))?;
    if world.last_error_kind != Some(expected) {
        return Err(eyre::eyre!(
            "expected error kind {expected:?}, found {:?}",
            world.last_error_kind
        ));
    }
    Ok(())
}
