/// Ownership/role policy for task mutation
///
/// The whole authorization model reduces to one predicate: a task may be
/// completed or deleted by its owner, or by anyone with role `admin`.
/// Listing renders modify links with the same predicate, so what a user
/// sees and what a user may do cannot drift apart.

use crate::models::task::Task;
use crate::models::user::Role;

/// Returns true if the identity may complete or delete `task`
///
/// Owner-match OR admin; nothing else grants mutation.
pub fn can_modify(user_id: i64, role: Role, task: &Task) -> bool {
    task.user_id == user_id || role.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskStatus;
    use chrono::{NaiveDate, Utc};

    fn task_owned_by(user_id: i64) -> Task {
        Task {
            id: 1,
            name: "Drink coffee".to_string(),
            due_date: NaiveDate::from_ymd_opt(2022, 4, 10).unwrap(),
            priority: 1,
            posted_date: NaiveDate::from_ymd_opt(2022, 4, 7).unwrap(),
            status: TaskStatus::Open,
            user_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_can_modify() {
        let task = task_owned_by(1);
        assert!(can_modify(1, Role::User, &task));
    }

    #[test]
    fn test_non_owner_cannot_modify() {
        let task = task_owned_by(1);
        assert!(!can_modify(2, Role::User, &task));
    }

    #[test]
    fn test_admin_can_modify_any_task() {
        let task = task_owned_by(1);
        assert!(can_modify(2, Role::Admin, &task));
        // Admin owning the task is also fine
        assert!(can_modify(1, Role::Admin, &task));
    }

    #[test]
    fn test_status_does_not_affect_policy() {
        let mut task = task_owned_by(1);
        task.status = TaskStatus::Complete;

        assert!(can_modify(1, Role::User, &task));
        assert!(!can_modify(2, Role::User, &task));
    }
}
