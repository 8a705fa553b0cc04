use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasklane_application::{CreateTaskInput, UpdateTaskInput};
use tasklane_core::{AppError, AppResult, ListId};
use tasklane_domain::{BoardList, Task, TaskStatus};
use ts_rs::TS;

/// Incoming payload for list creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-list-request.ts"
)]
pub struct CreateListRequest {
    pub title: String,
}

/// Incoming payload for list renames.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/rename-list-request.ts"
)]
pub struct RenameListRequest {
    pub title: String,
}

/// API representation of a board list.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/list-response.ts"
)]
pub struct ListResponse {
    pub id: String,
    pub board_id: String,
    pub title: String,
    pub position: i32,
    pub created_at: String,
}

impl From<BoardList> for ListResponse {
    fn from(list: BoardList) -> Self {
        Self {
            id: list.id.to_string(),
            board_id: list.board_id.to_string(),
            title: list.title,
            position: list.position,
            created_at: list.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for task creation inside a list.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-task-request.ts"
)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub due_date: Option<String>,
}

impl CreateTaskRequest {
    pub fn into_input(self, list_id: ListId) -> AppResult<CreateTaskInput> {
        let due_date = self
            .due_date
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(parse_timestamp)
            .transpose()?;

        Ok(CreateTaskInput {
            list_id,
            title: self.title,
            description: self.description,
            due_date,
        })
    }
}

/// Incoming payload for task edits. A blank description or due date clears it.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-task-request.ts"
)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub due_date: Option<String>,
}

impl UpdateTaskRequest {
    pub fn into_input(self) -> AppResult<UpdateTaskInput> {
        let due_date = self
            .due_date
            .as_deref()
            .map(str::trim)
            .map(|value| {
                if value.is_empty() {
                    Ok(None)
                } else {
                    parse_timestamp(value).map(Some)
                }
            })
            .transpose()?;

        Ok(UpdateTaskInput {
            title: self.title,
            description: self.description.map(Some),
            due_date,
        })
    }
}

/// Incoming payload for task status changes.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-task-status-request.ts"
)]
pub struct UpdateTaskStatusRequest {
    pub status: String,
}

impl UpdateTaskStatusRequest {
    pub fn parsed_status(&self) -> AppResult<TaskStatus> {
        self.status.trim().parse()
    }
}

/// Incoming payload for moving a task to another list on the same board.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/move-task-request.ts"
)]
pub struct MoveTaskRequest {
    pub list_id: String,
}

impl MoveTaskRequest {
    pub fn parsed_list_id(&self) -> AppResult<ListId> {
        self.list_id.trim().parse()
    }
}

/// API representation of a task.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/task-response.ts"
)]
pub struct TaskResponse {
    pub id: String,
    pub board_id: String,
    pub list_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            board_id: task.board_id.to_string(),
            list_id: task.list_id.to_string(),
            title: task.title,
            description: task.description,
            status: task.status.as_str().to_owned(),
            due_date: task.due_date.map(|value| value.to_rfc3339()),
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|error| AppError::Validation(format!("invalid due date '{value}': {error}")))
}
