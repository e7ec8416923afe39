use std::sync::Arc;

use anyhow::Context;
use todo_tracker::{
    db::{create_pool, run_migrations},
    routes::create_router,
    state::{AppState, Config},
    task::{InMemoryTaskRepository, TaskRepository, TaskService, TaskStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_tracker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn TaskStore> = match config.database_url.as_deref() {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let db = create_pool(database_url, config.database_max_connections)
                .await
                .context("failed to connect to database")?;

            tracing::info!("Running migrations...");
            run_migrations(&db).await.context("failed to run migrations")?;

            Arc::new(TaskRepository::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, tasks will be kept in memory only");
            Arc::new(InMemoryTaskRepository::new())
        }
    };

    let state = AppState {
        task_service: TaskService::new(store),
    };

    let app = create_router(state);

    let addr = config.addr();
    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
