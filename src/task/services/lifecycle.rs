//! Service layer for the task lifecycle.
//!
//! Every public operation returns an [`Envelope`]. Internally operations
//! propagate [`TaskServiceError`] with `?` and convert at the boundary.
//!
//! Notification dispatch follows [`NotificationPolicy`]: by default
//! `update_task` and `delete_task_from_project` notify the assignee while
//! `patch_task` and `update_task_status` do not. A dispatch outcome is only
//! ever reported in [`Envelope::notification`]; it never replaces the code of
//! a mutation that has already been committed.

use super::{
    Envelope, NotificationEvent, NotificationPolicy, NotificationReport, TaskServiceConfig,
    TaskServiceError, TaskServiceResult,
};
use crate::task::{
    domain::{
        DueDate, ProjectId, Task, TaskChanges, TaskDescription, TaskDetails, TaskDomainError,
        TaskDraft, TaskId, TaskStatus, UserId,
    },
    ports::{
        Notification, NotificationDispatcher, ProjectRepository, TaskFilter, TaskQuery,
        TaskRepository,
    },
};
use mockable::Clock;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    description: String,
    status: String,
    due_date: String,
    project_id: String,
    #[serde(default)]
    assigned_to_id: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request for an unassigned task.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        status: impl Into<String>,
        due_date: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            status: status.into(),
            due_date: due_date.into(),
            project_id: project_id.into(),
            assigned_to_id: None,
        }
    }

    /// Assigns the task to a user.
    #[must_use]
    pub fn with_assignee(mut self, user_id: impl Into<String>) -> Self {
        self.assigned_to_id = Some(user_id.into());
        self
    }
}

/// Request payload for `update_task` and `patch_task`.
///
/// Absent fields are left unchanged. The owning project cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    assigned_to_id: Option<Option<String>>,
}

impl UpdateTaskRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the replacement status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the replacement due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Assigns the task to a user.
    #[must_use]
    pub fn with_assignee(mut self, user_id: impl Into<String>) -> Self {
        self.assigned_to_id = Some(Some(user_id.into()));
        self
    }

    /// Clears the assignment.
    #[must_use]
    pub fn unassigned(mut self) -> Self {
        self.assigned_to_id = Some(None);
        self
    }

    fn into_changes(self, clock: &impl Clock) -> Result<TaskChanges, TaskDomainError> {
        let mut changes = TaskChanges::new(clock);
        changes.status = self
            .status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()?;
        changes.description = self.description.map(TaskDescription::new).transpose()?;
        changes.due_date = self.due_date.as_deref().map(DueDate::parse).transpose()?;
        changes.assigned_to_id = self
            .assigned_to_id
            .map(|assignee| assignee.as_deref().map(str::parse::<UserId>).transpose())
            .transpose()?;
        Ok(changes)
    }
}

/// Distinguishes an explicit `null` from an absent field.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskService<R, N, C>
where
    R: TaskRepository + ProjectRepository,
    N: NotificationDispatcher,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    dispatcher: Arc<N>,
    clock: Arc<C>,
    config: TaskServiceConfig,
}

impl<R, N, C> TaskService<R, N, C>
where
    R: TaskRepository + ProjectRepository,
    N: NotificationDispatcher,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, dispatcher: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            dispatcher,
            clock,
            config: TaskServiceConfig::default(),
        }
    }

    /// Replaces the service configuration.
    #[must_use]
    pub fn with_config(mut self, config: TaskServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active notification policy.
    #[must_use]
    pub const fn notification_policy(&self) -> &NotificationPolicy {
        &self.config.notifications
    }

    /// Creates a task.
    ///
    /// Checks run in order: project existence (404), status (400), other
    /// field formats (400), duplicate description (409). Returns 201 with
    /// the stored task.
    pub async fn create_task(&self, request: CreateTaskRequest) -> Envelope<Task> {
        debug!(project_id = %request.project_id, "creating task");
        match self.try_create_task(request).await {
            Ok(task) => {
                info!(task_id = %task.id(), project_id = %task.project_id(), "task created");
                Envelope::success(201, "Task created successfully", task)
            }
            Err(err) => reject("create_task", &err),
        }
    }

    /// Lists every task with its project and assignee, newest first.
    pub async fn fetch_tasks(&self) -> Envelope<Vec<TaskDetails>> {
        let query = TaskQuery::new(TaskFilter::all());
        match self.repository.find_all(&query).await {
            Ok(tasks) => Envelope::success(200, "Tasks fetched successfully", tasks),
            Err(err) => reject("fetch_tasks", &err.into()),
        }
    }

    /// Lists the tasks of a project.
    ///
    /// Returns 404 when the project has no tasks.
    pub async fn fetch_task_by_project_id(&self, project_id: &str) -> Envelope<Vec<TaskDetails>> {
        match self.try_fetch_by_project(project_id).await {
            Ok(tasks) => Envelope::success(200, "Tasks fetched successfully", tasks),
            Err(err) => reject("fetch_task_by_project_id", &err),
        }
    }

    /// Fetches one task with its project and assignee.
    ///
    /// Returns 404 when the task does not exist.
    pub async fn fetch_task_by_id(&self, task_id: &str) -> Envelope<TaskDetails> {
        let result = match parse_task_id(task_id) {
            Ok(id) => self.fetch_details(id, task_id).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(details) => Envelope::success(200, "Task fetched successfully", details),
            Err(err) => reject("fetch_task_by_id", &err),
        }
    }

    /// Lists the tasks assigned to a user.
    ///
    /// A user without tasks yields 200 with an empty list.
    pub async fn fetch_task_by_user_id(&self, user_id: &str) -> Envelope<Vec<TaskDetails>> {
        let Ok(user_id) = user_id.parse::<UserId>() else {
            return Envelope::success(200, "Tasks fetched successfully", Vec::new());
        };
        let query = TaskQuery::new(TaskFilter::by_assignee(user_id));
        match self.repository.find_all(&query).await {
            Ok(tasks) => Envelope::success(200, "Tasks fetched successfully", tasks),
            Err(err) => reject("fetch_task_by_user_id", &err.into()),
        }
    }

    /// Updates the supplied fields of a task and notifies the previous
    /// assignee.
    pub async fn update_task(&self, task_id: &str, request: UpdateTaskRequest) -> Envelope<Task> {
        match self.try_update(task_id, request).await {
            Ok((previous, updated)) => {
                info!(task_id = %updated.id(), "task updated");
                let report = self.notify(NotificationEvent::Updated, &previous).await;
                Envelope::success(200, "Task updated successfully", updated)
                    .with_notification(report)
            }
            Err(err) => reject("update_task", &err),
        }
    }

    /// Updates the supplied fields of a task and returns it re-read with
    /// its project and assignee.
    ///
    /// Does not notify unless [`NotificationPolicy::notify_on_patch`] is set.
    pub async fn patch_task(
        &self,
        task_id: &str,
        request: UpdateTaskRequest,
    ) -> Envelope<TaskDetails> {
        match self.try_update(task_id, request).await {
            Ok((previous, updated)) => {
                let details = self.committed_details(updated).await;
                info!(task_id = %details.task.id(), "task patched");
                let report = self.notify(NotificationEvent::Patched, &previous).await;
                Envelope::success(200, "Task patched successfully", details)
                    .with_notification(report)
            }
            Err(err) => reject("patch_task", &err),
        }
    }

    /// Deletes a task and notifies its assignee.
    pub async fn delete_task_from_project(&self, task_id: &str) -> Envelope<Task> {
        match self.try_delete(task_id).await {
            Ok(deleted) => {
                info!(task_id = %deleted.id(), "task deleted");
                let report = self.notify(NotificationEvent::Deleted, &deleted).await;
                Envelope::success(200, "Task deleted successfully", deleted)
                    .with_notification(report)
            }
            Err(err) => reject("delete_task_from_project", &err),
        }
    }

    /// Replaces the status of a task.
    ///
    /// The status is validated before the task is looked up, so an invalid
    /// status on a missing task reports 400 rather than 404.
    pub async fn update_task_status(&self, task_id: &str, status: &str) -> Envelope<Task> {
        match self.try_update_status(task_id, status).await {
            Ok(updated) => {
                info!(task_id = %updated.id(), status = %updated.status(), "task status updated");
                let report = self.notify(NotificationEvent::StatusChanged, &updated).await;
                Envelope::success(200, "Task status updated successfully", updated)
                    .with_notification(report)
            }
            Err(err) => reject("update_task_status", &err),
        }
    }

    async fn try_create_task(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let project_id = request
            .project_id
            .parse::<ProjectId>()
            .map_err(|_| TaskServiceError::ProjectNotFound(request.project_id.clone()))?;
        if self.repository.find_project(project_id).await?.is_none() {
            return Err(TaskServiceError::ProjectNotFound(request.project_id));
        }

        let status = TaskStatus::try_from(request.status.as_str()).map_err(TaskDomainError::from)?;
        let description = TaskDescription::new(&request.description)?;
        let due_date = DueDate::parse(&request.due_date)?;
        let assigned_to_id = request
            .assigned_to_id
            .as_deref()
            .map(str::parse::<UserId>)
            .transpose()?;

        // Fast path only; the store's uniqueness constraint is authoritative.
        let duplicate = TaskFilter::by_description(description.clone());
        if self.repository.find_one(&duplicate).await?.is_some() {
            return Err(TaskServiceError::Conflict(description));
        }

        let draft = TaskDraft {
            description,
            status,
            due_date,
            project_id,
            assigned_to_id,
            created_at: self.clock.utc(),
        };
        Ok(self.repository.create(&draft).await?)
    }

    async fn try_fetch_by_project(&self, raw_id: &str) -> TaskServiceResult<Vec<TaskDetails>> {
        let project_id = raw_id
            .parse::<ProjectId>()
            .map_err(|_| TaskServiceError::NoTasksForProject(raw_id.to_owned()))?;
        let tasks = self
            .repository
            .find_all(&TaskQuery::new(TaskFilter::by_project(project_id)))
            .await?;
        if tasks.is_empty() {
            return Err(TaskServiceError::NoTasksForProject(raw_id.to_owned()));
        }
        Ok(tasks)
    }

    async fn fetch_details(&self, id: TaskId, raw_id: &str) -> TaskServiceResult<TaskDetails> {
        self.repository
            .find_all(&TaskQuery::new(TaskFilter::by_id(id)))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TaskServiceError::TaskNotFound(raw_id.to_owned()))
    }

    /// Re-reads a committed task with its joins.
    ///
    /// The write has already happened, so a failed re-read falls back to the
    /// committed task without joins instead of reporting failure.
    async fn committed_details(&self, updated: Task) -> TaskDetails {
        let query = TaskQuery::new(TaskFilter::by_id(updated.id()));
        match self.repository.find_all(&query).await {
            Ok(found) => found.into_iter().next().unwrap_or_else(|| {
                warn!(task_id = %updated.id(), "patched task vanished before re-read");
                TaskDetails::unjoined(updated)
            }),
            Err(err) => {
                warn!(task_id = %updated.id(), error = %err, "re-read after patch failed");
                TaskDetails::unjoined(updated)
            }
        }
    }

    async fn find_existing(&self, id: TaskId, raw_id: &str) -> TaskServiceResult<Task> {
        self.repository
            .find_one(&TaskFilter::by_id(id))
            .await?
            .ok_or_else(|| TaskServiceError::TaskNotFound(raw_id.to_owned()))
    }

    async fn try_update(
        &self,
        raw_id: &str,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<(Task, Task)> {
        let id = parse_task_id(raw_id)?;
        let previous = self.find_existing(id, raw_id).await?;
        let changes = request.into_changes(&*self.clock)?;
        if changes.is_empty() {
            debug!(task_id = %id, "update carries no changes");
            return Ok((previous.clone(), previous));
        }
        let updated = self
            .repository
            .update(id, &changes)
            .await?
            .ok_or_else(|| TaskServiceError::TaskNotFound(raw_id.to_owned()))?;
        Ok((previous, updated))
    }

    async fn try_delete(&self, raw_id: &str) -> TaskServiceResult<Task> {
        let id = parse_task_id(raw_id)?;
        self.repository
            .delete(id)
            .await?
            .ok_or_else(|| TaskServiceError::TaskNotFound(raw_id.to_owned()))
    }

    async fn try_update_status(&self, raw_id: &str, raw_status: &str) -> TaskServiceResult<Task> {
        let status = TaskStatus::try_from(raw_status).map_err(TaskDomainError::from)?;
        let id = parse_task_id(raw_id)?;
        self.find_existing(id, raw_id).await?;
        let changes = TaskChanges::new(&*self.clock).with_status(status);
        self.repository
            .update(id, &changes)
            .await?
            .ok_or_else(|| TaskServiceError::TaskNotFound(raw_id.to_owned()))
    }

    /// Notifies the assignee of `task` when the policy enables `event`.
    ///
    /// Returns `None` when nothing was attempted.
    async fn notify(&self, event: NotificationEvent, task: &Task) -> Option<NotificationReport> {
        let policy = &self.config.notifications;
        if !policy.is_enabled(event) {
            return None;
        }
        let recipient = task.assigned_to_id()?;

        let outcome = match policy.render(event, task) {
            Ok(message) => {
                let notification = Notification::new(message, recipient);
                self.dispatcher.create_notification(&notification).await
            }
            Err(err) => Err(err),
        };

        let report = match outcome {
            Ok(receipt) => NotificationReport::from_receipt(recipient, receipt),
            Err(err) => NotificationReport::from_error(recipient, &err),
        };
        if report.is_delivered() {
            debug!(task_id = %task.id(), %recipient, ?event, "notification delivered");
        } else {
            warn!(
                task_id = %task.id(),
                %recipient,
                ?event,
                code = report.code,
                reason = %report.message,
                "notification failed after committed mutation"
            );
        }
        Some(report)
    }
}

/// Unparsable identifiers cannot match a stored task.
fn parse_task_id(raw_id: &str) -> TaskServiceResult<TaskId> {
    raw_id
        .parse::<TaskId>()
        .map_err(|_| TaskServiceError::TaskNotFound(raw_id.to_owned()))
}

fn reject<T>(operation: &'static str, err: &TaskServiceError) -> Envelope<T> {
    if matches!(err, TaskServiceError::Internal(_)) {
        warn!(operation, error = %err, "task operation failed");
    } else {
        debug!(operation, error = %err, "task operation rejected");
    }
    Envelope::failure(err)
}
