use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{error::Result, state::AppState};
use super::{
    task_dto::{CreateTaskRequest, ListTasksParams},
    task_models::Task,
};

/// List tasks matching a search and completion filter
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive substring of title or description"),
        ("filter" = Option<String>, Query, description = "done, undone, or anything else for all"),
        ("limit" = Option<u32>, Query, description = "Maximum number of tasks (default 10)"),
        ("offset" = Option<u32>, Query, description = "Number of tasks to skip (default 0)")
    ),
    responses(
        (status = 200, description = "Tasks ordered by due date", body = Vec<Task>)
    ),
    tag = "tasks"
)]
pub async fn get_tasks(
    State(state): State<AppState>,
    Query(params): Query<ListTasksParams>,
) -> Result<Json<Vec<Task>>> {
    let tasks = state.task_service.list(params.into()).await?;
    Ok(Json(tasks))
}

/// Create a new task
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid date format")
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let duedate = payload.due_date().map(str::to_owned);
    let task = state
        .task_service
        .create(payload.title, payload.description, duedate.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Delete a task, returning it as it was
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task deleted", body = Task),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>> {
    let task = state.task_service.delete(&task_id).await?;
    Ok(Json(task))
}

/// Mark a task as done
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}/done",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task marked done", body = Task),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn mark_done(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>> {
    let task = state.task_service.mark_done(&task_id).await?;
    Ok(Json(task))
}

/// Mark a task as not done
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}/undone",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task marked undone", body = Task),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn mark_undone(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>> {
    let task = state.task_service.mark_undone(&task_id).await?;
    Ok(Json(task))
}
