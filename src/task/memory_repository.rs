use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::task::task_models::{NewTask, Task, TaskQuery};
use crate::task::task_repository::TaskStore;

/// Process-local task store. Used when no database is configured and in tests.
#[derive(Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<DashMap<Uuid, Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<Task> {
        self.tasks.get(&id).map(|entry| entry.value().clone())
    }
}

/// Due date ascending, undated tasks last, then id for a stable order.
fn by_duedate(a: &Task, b: &Task) -> Ordering {
    let dates = match (a.duedate, b.duedate) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    dates.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl TaskStore for InMemoryTaskRepository {
    async fn find_many(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|entry| entry.value().matches(query))
            .map(|entry| entry.value().clone())
            .collect();

        tasks.sort_by(by_duedate);

        let offset = usize::try_from(query.offset).unwrap_or(0);
        let limit = usize::try_from(query.limit).unwrap_or(0);

        Ok(tasks.into_iter().skip(offset).take(limit).collect())
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            duedate: task.duedate,
            is_done: false,
        };
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Task>> {
        Ok(self.tasks.remove(&id).map(|(_, task)| task))
    }

    async fn set_done(&self, id: Uuid, is_done: bool) -> Result<Option<Task>> {
        Ok(self.tasks.get_mut(&id).map(|mut entry| {
            entry.is_done = is_done;
            entry.value().clone()
        }))
    }
}
