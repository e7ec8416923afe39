use std::borrow::Cow;

use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::task::task_models::{TaskFilter, TaskQuery, DEFAULT_LIMIT};
use crate::task::task_service::{parse_due_date, INVALID_DATE_MESSAGE};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Empty string means "no due date".
    #[serde(default)]
    #[validate(custom(function = "validate_due_date"))]
    pub duedate: Option<String>,
}

impl CreateTaskRequest {
    /// The due date as the service should see it, with the client's
    /// empty-string convention folded into `None`.
    pub fn due_date(&self) -> Option<&str> {
        self.duedate.as_deref().filter(|d| !d.trim().is_empty())
    }
}

fn validate_due_date(raw: &String) -> Result<(), ValidationError> {
    if raw.trim().is_empty() || parse_due_date(raw).is_ok() {
        return Ok(());
    }
    let mut err = ValidationError::new("invalid_date");
    err.message = Some(Cow::Borrowed(INVALID_DATE_MESSAGE));
    Err(err)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListTasksParams {
    pub search: Option<String>,
    pub filter: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl From<ListTasksParams> for TaskQuery {
    fn from(params: ListTasksParams) -> Self {
        Self {
            search: params.search.unwrap_or_default(),
            filter: params
                .filter
                .as_deref()
                .map(TaskFilter::from_query)
                .unwrap_or_default(),
            limit: params.limit.map_or(DEFAULT_LIMIT, i64::from),
            offset: params.offset.map_or(0, i64::from),
        }
    }
}
