use super::*;

use std::collections::BTreeSet;

use tasklane_core::{ListId, TaskId, UserId};
use tasklane_domain::{BoardList, Task, TaskStatus};

use crate::{CreateTaskInput, UpdateTaskInput};

impl BoardService {
    /// Creates a task in one of the board lists.
    pub async fn create_task(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        input: CreateTaskInput,
    ) -> AppResult<Task> {
        self.access
            .require_board_permissions(actor, board_id, &[BoardPermission::TaskCreate])
            .await?;
        let title = NonEmptyString::new(input.title.trim())?;
        self.require_list(board_id, input.list_id).await?;

        let now = Utc::now();
        self.tasks
            .create_task(Task {
                id: TaskId::new(),
                board_id,
                list_id: input.list_id,
                title: title.as_str().to_owned(),
                description: normalize_description(input.description),
                status: TaskStatus::Todo,
                due_date: input.due_date,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    /// Lists the tasks of one list.
    pub async fn list_tasks(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        list_id: ListId,
    ) -> AppResult<Vec<Task>> {
        self.access
            .require_board_membership(actor, board_id)
            .await?;
        self.require_list(board_id, list_id).await?;
        self.tasks.list_tasks(board_id, list_id).await
    }

    /// Returns one task.
    pub async fn get_task(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        task_id: TaskId,
    ) -> AppResult<Task> {
        self.access
            .require_board_membership(actor, board_id)
            .await?;
        self.require_task(board_id, task_id).await
    }

    /// Edits a task's title, description or due date.
    ///
    /// Changing the due date also requires `TASK_DUE_DATE_UPDATE` and tells the
    /// assignees.
    pub async fn update_task(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        task_id: TaskId,
        input: UpdateTaskInput,
    ) -> AppResult<Task> {
        let mut required = vec![BoardPermission::TaskUpdate];
        if input.due_date.is_some() {
            required.push(BoardPermission::TaskDueDateUpdate);
        }
        self.access
            .require_board_permissions(actor, board_id, &required)
            .await?;

        if input.title.is_none() && input.description.is_none() && input.due_date.is_none() {
            return Err(AppError::Validation(
                "at least one task field must be provided".to_owned(),
            ));
        }

        let mut task = self.require_task(board_id, task_id).await?;
        if let Some(title) = input.title {
            task.title = NonEmptyString::new(title.trim())?.as_str().to_owned();
        }
        if let Some(description) = input.description {
            task.description = normalize_description(description);
        }
        let previous_due_date = task.due_date;
        if let Some(due_date) = input.due_date {
            task.due_date = due_date;
        }
        task.updated_at = Utc::now();
        let task = self.tasks.save_task(&task).await?;

        if task.due_date != previous_due_date {
            self.notifications.notify_task_assignees(
                board_id,
                task_id,
                actor.user_id(),
                NotificationType::TaskDueDateUpdated,
                Some(json!({
                    "boardId": board_id,
                    "taskId": task_id,
                    "title": task.title,
                    "dueDate": task.due_date.map(|value| value.to_rfc3339()),
                })),
            );
        }

        Ok(task)
    }

    /// Assigns users with standing on the board to a task.
    pub async fn assign_task(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        task_id: TaskId,
        member_ids: Vec<UserId>,
    ) -> AppResult<Vec<UserId>> {
        let access = self
            .access
            .require_board_permissions(actor, board_id, &[BoardPermission::TaskAssign])
            .await?;
        let task = self.require_task(board_id, task_id).await?;
        let member_ids = unique_ids(member_ids)?;

        for member_id in &member_ids {
            if access.board.is_owned_by(*member_id) {
                continue;
            }
            if self
                .members
                .find_member(board_id, *member_id)
                .await?
                .is_none()
            {
                return Err(AppError::Validation(format!(
                    "user '{member_id}' is not a member of board '{board_id}'"
                )));
            }
        }

        let assigned = self.tasks.add_task_assignees(task_id, &member_ids).await?;
        let data = json!({ "boardId": board_id, "taskId": task_id, "title": task.title });
        self.notifications.create_and_send(
            assigned
                .iter()
                .filter(|user_id| **user_id != actor.user_id())
                .map(|user_id| {
                    NotificationDraft::new(*user_id, NotificationType::TaskAssigned)
                        .with_reference(board_id.as_uuid())
                        .with_data(data.clone())
                })
                .collect(),
        );

        Ok(assigned)
    }

    /// Removes assignees from a task.
    pub async fn unassign_task(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        task_id: TaskId,
        member_ids: Vec<UserId>,
    ) -> AppResult<Vec<UserId>> {
        self.access
            .require_board_permissions(actor, board_id, &[BoardPermission::TaskUnassign])
            .await?;
        let task = self.require_task(board_id, task_id).await?;
        let member_ids = unique_ids(member_ids)?;

        let removed = self
            .tasks
            .remove_task_assignees(task_id, &member_ids)
            .await?;
        let data = json!({ "boardId": board_id, "taskId": task_id, "title": task.title });
        self.notifications.create_and_send(
            removed
                .iter()
                .filter(|user_id| **user_id != actor.user_id())
                .map(|user_id| {
                    NotificationDraft::new(*user_id, NotificationType::TaskUnassigned)
                        .with_reference(board_id.as_uuid())
                        .with_data(data.clone())
                })
                .collect(),
        );

        Ok(removed)
    }

    /// Changes a task status and tells its assignees.
    pub async fn update_task_status(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        task_id: TaskId,
        status: TaskStatus,
    ) -> AppResult<Task> {
        self.access
            .require_board_permissions(actor, board_id, &[BoardPermission::TaskStatusUpdate])
            .await?;
        let mut task = self.require_task(board_id, task_id).await?;
        if task.status == status {
            return Ok(task);
        }

        let previous = task.status;
        task.status = status;
        task.updated_at = Utc::now();
        let task = self.tasks.save_task(&task).await?;

        let data = json!({
            "boardId": board_id,
            "taskId": task_id,
            "title": task.title,
            "from": previous.as_str(),
            "to": status.as_str(),
        });
        self.notifications.notify_task_assignees(
            board_id,
            task_id,
            actor.user_id(),
            NotificationType::TaskStatusUpdated,
            Some(data.clone()),
        );
        if status == TaskStatus::Done {
            self.notifications.notify_task_assignees(
                board_id,
                task_id,
                actor.user_id(),
                NotificationType::TaskCompleted,
                Some(data),
            );
        }

        Ok(task)
    }

    /// Moves a task to another list of the same board.
    pub async fn move_task(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        task_id: TaskId,
        list_id: ListId,
    ) -> AppResult<Task> {
        self.access
            .require_board_permissions(actor, board_id, &[BoardPermission::TaskMove])
            .await?;
        let mut task = self.require_task(board_id, task_id).await?;
        let target = self.require_list(board_id, list_id).await?;
        if task.list_id == list_id {
            return Ok(task);
        }

        let previous_list_id = task.list_id;
        task.list_id = list_id;
        task.updated_at = Utc::now();
        let task = self.tasks.save_task(&task).await?;

        self.notifications.notify_task_assignees(
            board_id,
            task_id,
            actor.user_id(),
            NotificationType::TaskMoved,
            Some(json!({
                "boardId": board_id,
                "taskId": task_id,
                "title": task.title,
                "fromListId": previous_list_id,
                "toListId": list_id,
                "toListTitle": target.title,
            })),
        );

        Ok(task)
    }

    /// Deletes a task.
    pub async fn delete_task(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        task_id: TaskId,
    ) -> AppResult<()> {
        self.access
            .require_board_permissions(actor, board_id, &[BoardPermission::TaskDelete])
            .await?;
        self.require_task(board_id, task_id).await?;
        self.tasks.delete_task(board_id, task_id).await
    }

    async fn require_list(
        &self,
        board_id: BoardId,
        list_id: ListId,
    ) -> AppResult<BoardList> {
        self.tasks
            .find_list(board_id, list_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "list '{list_id}' does not exist on board '{board_id}'"
                ))
            })
    }

    async fn require_task(&self, board_id: BoardId, task_id: TaskId) -> AppResult<Task> {
        self.tasks
            .find_task(board_id, task_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "task '{task_id}' does not exist on board '{board_id}'"
                ))
            })
    }
}

fn unique_ids(member_ids: Vec<UserId>) -> AppResult<Vec<UserId>> {
    let unique: BTreeSet<UserId> = member_ids.into_iter().collect();
    if unique.is_empty() {
        return Err(AppError::Validation(
            "at least one member id is required".to_owned(),
        ));
    }

    Ok(unique.into_iter().collect())
}
