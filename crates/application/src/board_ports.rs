use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tasklane_core::{AppResult, BoardId, ListId, TaskId, UserId};
use tasklane_domain::{Board, BoardList, BoardMember, Task};

/// Board together with the caller's explicit membership row, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardStanding {
    /// The board being accessed.
    pub board: Board,
    /// Membership row of the looked-up user.
    pub membership: Option<BoardMember>,
}

/// Repository port for board membership rows and audience lookups.
#[async_trait]
pub trait BoardMemberRepository: Send + Sync {
    /// Loads a board and one user's membership row in a single read.
    ///
    /// Returns `None` when the board does not exist.
    async fn find_standing(
        &self,
        board_id: BoardId,
        user_id: UserId,
    ) -> AppResult<Option<BoardStanding>>;

    /// Finds one membership row.
    async fn find_member(
        &self,
        board_id: BoardId,
        member_id: UserId,
    ) -> AppResult<Option<BoardMember>>;

    /// Lists membership rows ordered by join time.
    async fn list_members(&self, board_id: BoardId) -> AppResult<Vec<BoardMember>>;

    /// Inserts membership rows, skipping users that are already members.
    ///
    /// Returns the rows actually inserted. Unknown users yield a validation error.
    async fn add_members(
        &self,
        board_id: BoardId,
        members: Vec<BoardMember>,
    ) -> AppResult<Vec<BoardMember>>;

    /// Writes roles and permissions of an existing row in one statement.
    async fn save_member(&self, member: &BoardMember) -> AppResult<BoardMember>;

    /// Deletes membership rows and returns the ids that were removed.
    async fn remove_members(
        &self,
        board_id: BoardId,
        member_ids: &[UserId],
    ) -> AppResult<Vec<UserId>>;

    /// Lists the board owner followed by every member, without duplicates.
    async fn list_member_ids(&self, board_id: BoardId) -> AppResult<Vec<UserId>>;

    /// Lists the board owner followed by members holding the manager role.
    async fn list_owner_and_manager_ids(&self, board_id: BoardId) -> AppResult<Vec<UserId>>;

    /// Lists the assignees of a task.
    async fn list_task_assignee_ids(&self, task_id: TaskId) -> AppResult<Vec<UserId>>;
}

/// Repository port for board records.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Persists a new board.
    async fn create_board(&self, board: Board) -> AppResult<Board>;

    /// Finds a board by id.
    async fn find_board(&self, board_id: BoardId) -> AppResult<Option<Board>>;

    /// Lists boards the user owns or is a member of, newest first.
    async fn list_boards_for_user(&self, user_id: UserId) -> AppResult<Vec<Board>>;

    /// Persists title and description changes.
    async fn update_board(&self, board: &Board) -> AppResult<Board>;

    /// Deletes a board together with its members, lists and tasks.
    async fn delete_board(&self, board_id: BoardId) -> AppResult<()>;
}

/// Input payload for task creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskInput {
    /// Target list.
    pub list_id: ListId,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
}

/// Input payload for task edits. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskInput {
    /// New title.
    pub title: Option<String>,
    /// New description. `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New due date. `Some(None)` clears it.
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Repository port for lists, tasks and task assignees.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persists a new list at the end of the board.
    async fn create_list(&self, board_id: BoardId, title: &str) -> AppResult<BoardList>;

    /// Finds a list scoped to its board.
    async fn find_list(&self, board_id: BoardId, list_id: ListId)
    -> AppResult<Option<BoardList>>;

    /// Lists board lists ordered by position.
    async fn list_lists(&self, board_id: BoardId) -> AppResult<Vec<BoardList>>;

    /// Renames a list.
    async fn rename_list(
        &self,
        board_id: BoardId,
        list_id: ListId,
        title: &str,
    ) -> AppResult<BoardList>;

    /// Deletes a list and its tasks.
    async fn delete_list(&self, board_id: BoardId, list_id: ListId) -> AppResult<()>;

    /// Persists a new task.
    async fn create_task(&self, task: Task) -> AppResult<Task>;

    /// Finds a task scoped to its board.
    async fn find_task(&self, board_id: BoardId, task_id: TaskId) -> AppResult<Option<Task>>;

    /// Lists tasks of one list, oldest first.
    async fn list_tasks(&self, board_id: BoardId, list_id: ListId) -> AppResult<Vec<Task>>;

    /// Writes every mutable task field.
    async fn save_task(&self, task: &Task) -> AppResult<Task>;

    /// Deletes a task.
    async fn delete_task(&self, board_id: BoardId, task_id: TaskId) -> AppResult<()>;

    /// Adds assignees, skipping existing ones, and returns the ids inserted.
    async fn add_task_assignees(
        &self,
        task_id: TaskId,
        member_ids: &[UserId],
    ) -> AppResult<Vec<UserId>>;

    /// Removes assignees and returns the ids removed.
    async fn remove_task_assignees(
        &self,
        task_id: TaskId,
        member_ids: &[UserId],
    ) -> AppResult<Vec<UserId>>;
}
