/// Task endpoints
///
/// Listing, creation, completion, and deletion. All routes here sit behind
/// the session guard. Whether an identity may mutate a given task is
/// answered by `auth::policy::can_modify` alone, both when rendering modify
/// links and when acting on them.
///
/// # Endpoints
///
/// - `GET /tasks` - List all tasks
/// - `POST /add` - Create a task (form fields `name`, `due_date`,
///   `priority`, `posted_date`, `status`)
/// - `GET /complete/:id` - Mark a task complete
/// - `GET /delete/:id` - Delete a task

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Form, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskr_shared::{
    auth::{policy::can_modify, session::Identity},
    models::task::{CreateTask, Task, TaskStatus},
};
use validator::Validate;

/// Ownership refusal for the complete action
const CANNOT_UPDATE_MESSAGE: &str = "You can only update tasks that belong to you.";

/// Ownership refusal for the delete action
const CANNOT_DELETE_MESSAGE: &str = "You can only delete tasks that belong to you.";

/// Plain message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// One task as rendered in the listing
///
/// `complete_url` and `delete_url` are the modify affordances; they are
/// present only when the current identity may mutate the task.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskView {
    pub id: i64,
    pub name: String,
    pub due_date: NaiveDate,
    pub priority: i32,
    pub posted_date: NaiveDate,
    pub status: TaskStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_url: Option<String>,
}

impl TaskView {
    /// Renders a task for `identity`, attaching modify links only where the
    /// policy allows
    fn for_identity(task: Task, identity: &Identity) -> Self {
        let allowed = can_modify(identity.user_id, identity.role, &task);

        Self {
            complete_url: allowed.then(|| format!("/complete/{}", task.id)),
            delete_url: allowed.then(|| format!("/delete/{}", task.id)),
            id: task.id,
            name: task.name,
            due_date: task.due_date,
            priority: task.priority,
            posted_date: task.posted_date,
            status: task.status,
        }
    }
}

/// Task listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    /// Display name of the logged-in user
    pub name: String,

    /// Open tasks, most urgent due date first
    pub open_tasks: Vec<TaskView>,

    /// Completed tasks, most recently posted first
    pub closed_tasks: Vec<TaskView>,
}

/// Add-task request
#[derive(Debug, Deserialize, Validate)]
pub struct AddTaskRequest {
    /// What needs doing
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    /// Due date (YYYY-MM-DD)
    pub due_date: NaiveDate,

    /// Priority (higher is more urgent)
    pub priority: i32,

    /// Posted date (YYYY-MM-DD)
    pub posted_date: NaiveDate,

    /// Initial status
    pub status: TaskStatus,
}

/// Task listing handler (guarded)
///
/// Returns every task, open and closed, with modify links attached only to
/// tasks the identity may mutate. Unauthenticated requests never reach this
/// handler; the guard answers them with the login notice.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<TaskListResponse>> {
    let open = Task::list_open(&state.db).await?;
    let closed = Task::list_closed(&state.db).await?;

    let open_tasks = open
        .into_iter()
        .map(|t| TaskView::for_identity(t, &identity))
        .collect();
    let closed_tasks = closed
        .into_iter()
        .map(|t| TaskView::for_identity(t, &identity))
        .collect();

    Ok(Json(TaskListResponse {
        name: identity.name,
        open_tasks,
        closed_tasks,
    }))
}

/// Add-task handler (guarded)
///
/// Inserts a task owned by the current identity. Ids come from the global
/// sequence. Validation failures happen before any write.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Missing or empty fields
pub async fn add_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Form(req): Form<AddTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate().map_err(validation_error)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            name: req.name,
            due_date: req.due_date,
            priority: req.priority,
            posted_date: req.posted_date,
            status: req.status,
            user_id: identity.user_id,
        },
    )
    .await?;

    tracing::info!(task_id = task.id, user_id = identity.user_id, "Task created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "New entry was successfully posted. Thanks.".to_string(),
        }),
    ))
}

/// Complete-task handler (guarded)
///
/// Sets the task's status to complete, a one-way transition. Refused with
/// an explicit ownership message when the identity is neither the owner nor
/// an admin; nothing changes on refusal.
///
/// # Errors
///
/// - `403 Forbidden`: Not the owner and not an admin
/// - `404 Not Found`: No such task
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No task with id {}", id)))?;

    if !can_modify(identity.user_id, identity.role, &task) {
        return Err(ApiError::Forbidden(CANNOT_UPDATE_MESSAGE.to_string()));
    }

    let updated = Task::mark_complete(&state.db, id).await?;
    if !updated {
        // Task vanished between the lookup and the update
        return Err(ApiError::NotFound(format!("No task with id {}", id)));
    }

    tracing::info!(task_id = id, user_id = identity.user_id, "Task completed");

    Ok(Json(MessageResponse {
        message: "The task is complete. Nice.".to_string(),
    }))
}

/// Delete-task handler (guarded)
///
/// Removes the task row. Same policy as completion.
///
/// # Errors
///
/// - `403 Forbidden`: Not the owner and not an admin
/// - `404 Not Found`: No such task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No task with id {}", id)))?;

    if !can_modify(identity.user_id, identity.role, &task) {
        return Err(ApiError::Forbidden(CANNOT_DELETE_MESSAGE.to_string()));
    }

    let removed = Task::delete(&state.db, id).await?;
    if !removed {
        return Err(ApiError::NotFound(format!("No task with id {}", id)));
    }

    tracing::info!(task_id = id, user_id = identity.user_id, "Task deleted");

    Ok(Json(MessageResponse {
        message: "The task was deleted.".to_string(),
    }))
}
