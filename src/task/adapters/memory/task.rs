//! In-memory repository for task lifecycle tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{
        Project, ProjectId, Task, TaskChanges, TaskDescription, TaskDetails, TaskDraft, TaskId,
        User, UserId,
    },
    ports::{
        ProjectRepository, TaskFilter, TaskQuery, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult, TaskSort,
    },
};

/// Thread-safe in-memory task repository.
///
/// Description uniqueness is checked under the write lock, so it holds even
/// when callers race past their own pre-checks.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    description_index: HashMap<TaskDescription, TaskId>,
    projects: HashMap<ProjectId, Project>,
    users: HashMap<UserId, User>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a project so tasks can reference it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn insert_project(&self, project: Project) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state.projects.insert(project.id, project);
        Ok(())
    }

    /// Registers a user so joined reads can resolve it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn insert_user(&self, user: User) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state.users.insert(user.id, user);
        Ok(())
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn join_details(state: &InMemoryTaskState, task: &Task) -> TaskDetails {
    TaskDetails {
        task: task.clone(),
        project: state.projects.get(&task.project_id()).cloned(),
        assigned_to: task
            .assigned_to_id()
            .and_then(|user_id| state.users.get(&user_id))
            .cloned(),
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_one(&self, filter: &TaskFilter) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        let task = match (filter.id, filter.description.as_ref()) {
            (Some(id), _) => state.tasks.get(&id).filter(|task| filter.matches(task)),
            (None, Some(description)) => state
                .description_index
                .get(description)
                .and_then(|id| state.tasks.get(id))
                .filter(|task| filter.matches(task)),
            (None, None) => state.tasks.values().find(|task| filter.matches(task)),
        };
        Ok(task.cloned())
    }

    async fn find_all(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<TaskDetails>> {
        let state = self.read()?;
        let mut matching: Vec<&Task> = state
            .tasks
            .values()
            .filter(|task| query.filter.matches(task))
            .collect();
        match query.sort {
            TaskSort::CreatedAtDesc => {
                matching.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
            }
            TaskSort::CreatedAtAsc => matching.sort_by_key(|task| task.created_at()),
        }
        Ok(matching
            .into_iter()
            .map(|task| join_details(&state, task))
            .collect())
    }

    async fn create(&self, draft: &TaskDraft) -> TaskRepositoryResult<Task> {
        let mut state = self.write()?;
        if state.description_index.contains_key(&draft.description) {
            return Err(TaskRepositoryError::DuplicateDescription(
                draft.description.clone(),
            ));
        }
        if !state.projects.contains_key(&draft.project_id) {
            return Err(TaskRepositoryError::MissingProject(draft.project_id));
        }

        let task = Task::from_draft(TaskId::new(), draft.clone());
        state
            .description_index
            .insert(task.description().clone(), task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(task)
    }

    async fn update(
        &self,
        id: TaskId,
        changes: &TaskChanges,
    ) -> TaskRepositoryResult<Option<Task>> {
        let mut state = self.write()?;
        let Some(mut task) = state.tasks.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(description) = &changes.description {
            let owner = state.description_index.get(description).copied();
            if owner.is_some_and(|owner_id| owner_id != id) {
                return Err(TaskRepositoryError::DuplicateDescription(
                    description.clone(),
                ));
            }
            state.description_index.remove(task.description());
            state.description_index.insert(description.clone(), id);
        }

        task.apply(changes);
        state.tasks.insert(id, task.clone());
        Ok(Some(task))
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let mut state = self.write()?;
        let removed = state.tasks.remove(&id);
        if let Some(task) = &removed {
            state.description_index.remove(task.description());
        }
        Ok(removed)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryTaskRepository {
    async fn find_project(&self, id: ProjectId) -> TaskRepositoryResult<Option<Project>> {
        let state = self.read()?;
        Ok(state.projects.get(&id).cloned())
    }
}
