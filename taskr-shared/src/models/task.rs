/// Task model and database operations
///
/// A task belongs to exactly one user, fixed at creation; ids come from a
/// single global sequence, so the first task created overall is id 1
/// regardless of owner.
///
/// # State Machine
///
/// ```text
/// open -> complete
/// ```
///
/// One-way: there is no reopen transition.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('open', 'complete');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL,
///     due_date DATE NOT NULL,
///     priority INTEGER NOT NULL,
///     posted_date DATE NOT NULL,
///     status task_status NOT NULL DEFAULT 'open',
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task is still to be done
    Open,

    /// Task has been marked done
    Complete,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Complete => "complete",
        }
    }
}

/// Task model representing a to-do entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Sequential task ID (global counter, not per-owner)
    pub id: i64,

    /// What needs doing
    pub name: String,

    /// When it is due
    pub due_date: NaiveDate,

    /// Priority (higher is more urgent)
    pub priority: i32,

    /// When it was posted
    pub posted_date: NaiveDate,

    /// Current status
    pub status: TaskStatus,

    /// Owner; never reassigned after creation
    pub user_id: i64,

    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub name: String,
    pub due_date: NaiveDate,
    pub priority: i32,
    pub posted_date: NaiveDate,
    pub status: TaskStatus,

    /// Owner, taken from the authenticated identity
    pub user_id: i64,
}

impl Task {
    /// Creates a new task owned by `data.user_id`
    pub async fn create<'a>(
        db: impl PgExecutor<'a>,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (name, due_date, priority, posted_date, status, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, due_date, priority, posted_date, status, user_id, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.due_date)
        .bind(data.priority)
        .bind(data.posted_date)
        .bind(data.status)
        .bind(data.user_id)
        .fetch_one(db)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id<'a>(
        db: impl PgExecutor<'a>,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, due_date, priority, posted_date, status, user_id, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(task)
    }

    /// Lists all open tasks, most urgent due date first
    pub async fn list_open<'a>(db: impl PgExecutor<'a>) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, due_date, priority, posted_date, status, user_id, created_at
            FROM tasks
            WHERE status = 'open'
            ORDER BY due_date ASC, id ASC
            "#,
        )
        .fetch_all(db)
        .await?;

        Ok(tasks)
    }

    /// Lists all completed tasks, most recently posted first
    pub async fn list_closed<'a>(db: impl PgExecutor<'a>) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, due_date, priority, posted_date, status, user_id, created_at
            FROM tasks
            WHERE status = 'complete'
            ORDER BY posted_date DESC, id ASC
            "#,
        )
        .fetch_all(db)
        .await?;

        Ok(tasks)
    }

    /// Marks a task complete
    ///
    /// Idempotent: completing an already complete task is a no-op success.
    /// Returns false if no such task exists.
    pub async fn mark_complete<'a>(db: impl PgExecutor<'a>, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tasks SET status = 'complete' WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a task by ID
    ///
    /// Returns false if no such task exists.
    pub async fn delete<'a>(db: impl PgExecutor<'a>, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
