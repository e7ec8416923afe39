use crate::{
    state::AppState,
    task::{self, task_handlers, Task, TaskFilter},
};
use axum::{
    routing::{delete, get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        task_handlers::get_tasks,
        task_handlers::create_task,
        task_handlers::delete_task,
        task_handlers::mark_done,
        task_handlers::mark_undone,
    ),
    components(
        schemas(
            task::CreateTaskRequest,
            Task,
            TaskFilter,
        )
    ),
    tags(
        (name = "tasks", description = "Task management endpoints")
    )
)]
struct ApiDoc;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let task_routes = Router::new()
        .route("/", get(task::get_tasks).post(task::create_task))
        .route("/:id", delete(task::delete_task))
        .route("/:id/done", patch(task::mark_done))
        .route("/:id/undone", patch(task::mark_undone));

    let api_routes = Router::new().nest("/tasks", task_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
