use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_LIMIT: i64 = 10;

/// Completion-state selector applied when listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Done,
    Undone,
}

impl TaskFilter {
    /// Lenient conversion used at the wire boundary: only `done` and `undone`
    /// restrict the listing, every other value lists everything.
    pub fn from_query(raw: &str) -> Self {
        match raw {
            "done" => TaskFilter::Done,
            "undone" => TaskFilter::Undone,
            "" | "none" | "all" => TaskFilter::All,
            other => {
                tracing::warn!("Unrecognized task filter {:?}, listing all tasks", other);
                TaskFilter::All
            }
        }
    }

    /// The `is_done` value a task must have to pass this filter, if any.
    pub fn is_done(self) -> Option<bool> {
        match self {
            TaskFilter::All => None,
            TaskFilter::Done => Some(true),
            TaskFilter::Undone => Some(false),
        }
    }
}

impl std::fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskFilter::All => write!(f, "all"),
            TaskFilter::Done => write!(f, "done"),
            TaskFilter::Undone => write!(f, "undone"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duedate: Option<DateTime<Utc>>,
    pub is_done: bool,
}

impl Task {
    pub fn matches(&self, query: &TaskQuery) -> bool {
        let needle = query.search.to_lowercase();
        let in_title = self.title.to_lowercase().contains(&needle);
        let in_description = self
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle));

        let state_ok = query
            .filter
            .is_done()
            .map_or(true, |wanted| self.is_done == wanted);

        (in_title || in_description) && state_ok
    }
}

/// Fields supplied on creation; the store assigns `id` and `is_done = false`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub duedate: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskQuery {
    pub search: String,
    pub filter: TaskFilter,
    pub limit: i64,
    pub offset: i64,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            filter: TaskFilter::All,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
