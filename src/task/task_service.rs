use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::task::task_models::{NewTask, Task, TaskQuery};
use crate::task::task_repository::TaskStore;

pub const INVALID_DATE_MESSAGE: &str = "Invalid date format";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a due date into a UTC instant.
///
/// Accepts RFC 3339 timestamps with any offset, bare calendar dates
/// (midnight UTC) and offset-less date-times (taken as UTC). Anything else,
/// the empty string included, is a validation error.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::Validation(INVALID_DATE_MESSAGE.to_string()))
}

fn parse_task_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Task not found".into()))
}

/// Service layer for task business logic. Holds no state beyond the store handle.
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskStore>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, query: TaskQuery) -> Result<Vec<Task>> {
        tracing::debug!(
            search = %query.search,
            filter = %query.filter,
            limit = query.limit,
            offset = query.offset,
            "Listing tasks"
        );
        self.repo.find_many(&query).await
    }

    /// Create a task. `duedate` of `None` means no due date; a supplied string
    /// must parse, so `Some("")` is rejected.
    pub async fn create(
        &self,
        title: String,
        description: Option<String>,
        duedate: Option<&str>,
    ) -> Result<Task> {
        let duedate = duedate.map(parse_due_date).transpose()?;

        let task = self
            .repo
            .create(NewTask {
                title,
                description,
                duedate,
            })
            .await?;

        tracing::info!(task_id = %task.id, "Task created");
        Ok(task)
    }

    pub async fn delete(&self, id: &str) -> Result<Task> {
        let id = parse_task_id(id)?;
        let task = self
            .repo
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        tracing::info!(task_id = %task.id, "Task deleted");
        Ok(task)
    }

    pub async fn mark_done(&self, id: &str) -> Result<Task> {
        self.set_done(id, true).await
    }

    pub async fn mark_undone(&self, id: &str) -> Result<Task> {
        self.set_done(id, false).await
    }

    async fn set_done(&self, id: &str, is_done: bool) -> Result<Task> {
        let id = parse_task_id(id)?;
        let task = self
            .repo
            .set_done(id, is_done)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        tracing::debug!(task_id = %task.id, is_done, "Task completion updated");
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::memory_repository::InMemoryTaskRepository;
    use crate::task::task_models::TaskFilter;
    use chrono::TimeZone;

    fn service() -> (TaskService, InMemoryTaskRepository) {
        let repo = InMemoryTaskRepository::new();
        (TaskService::new(Arc::new(repo.clone())), repo)
    }

    fn filtered(filter: TaskFilter) -> TaskQuery {
        TaskQuery {
            filter,
            ..TaskQuery::default()
        }
    }

    #[test]
    fn test_parse_due_date_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_due_date("2024-01-01").unwrap(), midnight);
        assert_eq!(parse_due_date("2024-01-01T00:00:00Z").unwrap(), midnight);
        assert_eq!(parse_due_date("2024-01-01T00:00:00.000Z").unwrap(), midnight);
        assert_eq!(parse_due_date("2024-01-01T02:00:00+02:00").unwrap(), midnight);
        assert_eq!(parse_due_date("2024-01-01T00:00").unwrap(), midnight);
        assert_eq!(parse_due_date("2024-01-01 00:00:00").unwrap(), midnight);
    }

    #[test]
    fn test_parse_due_date_rejects_garbage() {
        for raw in ["", "   ", "not-a-date", "2024-13-01", "2024-02-30", "01/02/2024"] {
            match parse_due_date(raw) {
                Err(AppError::Validation(msg)) => assert_eq!(msg, INVALID_DATE_MESSAGE),
                other => panic!("expected validation error for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (service, _) = service();
        let task = service
            .create("Buy milk".into(), Some(String::new()), Some("2024-01-01"))
            .await
            .unwrap();

        assert!(!task.is_done);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description.as_deref(), Some(""));
        assert_eq!(task.duedate, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));

        let listed = service.list(TaskQuery::default()).await.unwrap();
        assert_eq!(listed, vec![task]);
    }

    #[tokio::test]
    async fn test_create_without_duedate() {
        let (service, _) = service();
        let task = service.create("Someday".into(), None, None).await.unwrap();
        assert!(task.duedate.is_none());
    }

    #[tokio::test]
    async fn test_create_invalid_date_creates_nothing() {
        let (service, repo) = service();

        for raw in ["not-a-date", ""] {
            let err = service
                .create("X".into(), Some(String::new()), Some(raw))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == INVALID_DATE_MESSAGE));
        }

        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_delete_returns_prior_state() {
        let (service, repo) = service();
        let task = service.create("Gone".into(), None, None).await.unwrap();
        let done = service.mark_done(&task.id.to_string()).await.unwrap();

        let deleted = service.delete(&task.id.to_string()).await.unwrap();
        assert_eq!(deleted, done);
        assert!(repo.get(task.id).is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_leaves_store_unchanged() {
        let (service, repo) = service();
        service.create("Keep".into(), None, None).await.unwrap();

        let err = service.delete(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service.delete("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_done_round_trip() {
        let (service, _) = service();
        let task = service
            .create("Toggle".into(), Some("desc".into()), Some("2024-05-05"))
            .await
            .unwrap();
        let id = task.id.to_string();

        let done = service.mark_done(&id).await.unwrap();
        assert!(done.is_done);
        assert_eq!(done.title, task.title);
        assert_eq!(done.description, task.description);
        assert_eq!(done.duedate, task.duedate);

        let undone = service.mark_undone(&id).await.unwrap();
        assert_eq!(undone, task);
    }

    #[tokio::test]
    async fn test_mark_done_is_idempotent() {
        let (service, _) = service();
        let task = service.create("Twice".into(), None, None).await.unwrap();
        let id = task.id.to_string();

        let first = service.mark_done(&id).await.unwrap();
        let second = service.mark_done(&id).await.unwrap();
        assert_eq!(first, second);
        assert!(second.is_done);
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_is_not_found() {
        let (service, _) = service();
        let id = Uuid::new_v4().to_string();
        assert!(matches!(service.mark_done(&id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.mark_undone(&id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_filter_partitions_tasks() {
        let (service, _) = service();
        let a = service.create("A".into(), None, Some("2024-01-01")).await.unwrap();
        let b = service.create("B".into(), None, Some("2024-01-02")).await.unwrap();
        service.mark_done(&a.id.to_string()).await.unwrap();

        let done = service.list(filtered(TaskFilter::Done)).await.unwrap();
        assert_eq!(done.len(), 1);
        assert!(done.iter().all(|t| t.is_done));

        let undone = service.list(filtered(TaskFilter::Undone)).await.unwrap();
        assert_eq!(undone, vec![b]);

        let all = service
            .list(filtered(TaskFilter::from_query("anything-else")))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_search_and_ordering() {
        let (service, _) = service();
        service
            .create("Groceries".into(), Some("milk and EGGS".into()), Some("2024-03-01"))
            .await
            .unwrap();
        service
            .create("Eggs benedict".into(), None, Some("2024-02-01"))
            .await
            .unwrap();
        service.create("eggnog".into(), None, None).await.unwrap();
        service.create("Laundry".into(), None, Some("2024-01-01")).await.unwrap();

        let query = TaskQuery {
            search: "egg".into(),
            ..TaskQuery::default()
        };
        let titles: Vec<String> = service
            .list(query)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Eggs benedict", "Groceries", "eggnog"]);

        let all = service.list(TaskQuery::default()).await.unwrap();
        assert_eq!(all.len(), 4);
        let dated: Vec<_> = all.iter().filter_map(|t| t.duedate).collect();
        assert!(dated.windows(2).all(|w| w[0] <= w[1]));
        assert!(all.last().unwrap().duedate.is_none());
    }
}
