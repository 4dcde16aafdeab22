//! Shared fixtures for task service unit tests.

use std::sync::Arc;

use crate::task::{
    adapters::memory::{InMemoryTaskRepository, RecordingNotificationDispatcher},
    domain::{Project, ProjectId, Task, User, UserId},
    services::{CreateTaskRequest, TaskService, TaskServiceConfig},
};
use mockable::DefaultClock;
use rstest::fixture;

pub type TestService =
    TaskService<InMemoryTaskRepository, RecordingNotificationDispatcher, DefaultClock>;

/// Service wired to in-memory adapters with one project and one user.
pub struct Harness {
    pub service: TestService,
    pub repository: InMemoryTaskRepository,
    pub dispatcher: RecordingNotificationDispatcher,
    pub project_id: ProjectId,
    pub user_id: UserId,
}

impl Harness {
    pub fn new(config: TaskServiceConfig) -> Self {
        let repository = InMemoryTaskRepository::new();
        let dispatcher = RecordingNotificationDispatcher::new();
        let project_id = ProjectId::new();
        let user_id = UserId::new();
        repository
            .insert_project(Project::new(project_id, "Website relaunch"))
            .expect("seed project");
        repository
            .insert_user(User::new(user_id, "Robin"))
            .expect("seed user");

        let service = TaskService::new(
            Arc::new(repository.clone()),
            Arc::new(dispatcher.clone()),
            Arc::new(DefaultClock),
        )
        .with_config(config);

        Self {
            service,
            repository,
            dispatcher,
            project_id,
            user_id,
        }
    }

    pub fn request(&self, description: &str) -> CreateTaskRequest {
        CreateTaskRequest::new(
            description,
            "in-progress",
            "2026-06-30",
            self.project_id.to_string(),
        )
    }

    pub async fn create(&self, request: CreateTaskRequest) -> Task {
        let envelope = self.service.create_task(request).await;
        assert_eq!(envelope.code, 201, "unexpected envelope: {envelope:?}");
        envelope.details.expect("created task")
    }

    pub async fn create_assigned(&self, description: &str) -> Task {
        let request = self.request(description).with_assignee(self.user_id.to_string());
        self.create(request).await
    }
}

#[fixture]
pub fn harness() -> Harness {
    Harness::new(TaskServiceConfig::default())
}
