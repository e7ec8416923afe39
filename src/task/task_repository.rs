use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::task::task_models::{NewTask, Task, TaskQuery};

/// Persistence operations the task service relies on.
///
/// Every call is a single-row (or single-statement) operation; atomicity is
/// whatever the backing store guarantees for it. `None` means no task has the
/// given id.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks matching `query`, ordered by due date ascending with undated
    /// tasks last, paginated by `limit`/`offset`.
    async fn find_many(&self, query: &TaskQuery) -> Result<Vec<Task>>;

    async fn create(&self, task: NewTask) -> Result<Task>;

    /// Remove a task, returning the row as it was before deletion.
    async fn delete(&self, id: Uuid) -> Result<Option<Task>>;

    async fn set_done(&self, id: Uuid, is_done: bool) -> Result<Option<Task>>;
}

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for TaskRepository {
    async fn find_many(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        // strpos keeps the search a literal substring: no LIKE wildcards to escape.
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks
             WHERE (strpos(lower(title), lower($1)) > 0
                    OR strpos(lower(COALESCE(description, '')), lower($1)) > 0)
               AND ($2::boolean IS NULL OR is_done = $2)
             ORDER BY duedate ASC NULLS LAST, id ASC
             LIMIT $3 OFFSET $4",
        )
        .bind(&query.search)
        .bind(query.filter.is_done())
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (title, description, duedate)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(&task.title)
        .bind(task.description.as_deref())
        .bind(task.duedate)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("DELETE FROM tasks WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    async fn set_done(&self, id: Uuid, is_done: bool) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET is_done = $1
             WHERE id = $2
             RETURNING *",
        )
        .bind(is_done)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }
}
