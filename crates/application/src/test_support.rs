//! In-memory fakes shared by service tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tasklane_core::{
    AppError, AppResult, BoardId, ListId, NotificationId, TaskId, UserId, UserIdentity,
};
use tasklane_domain::{Board, BoardList, BoardMember, BoardRole, Notification, Task};
use tokio::sync::Mutex;

use crate::{
    BoardAccessService, BoardMemberRepository, BoardMemberService, BoardRepository,
    BoardService, BoardStanding, NotificationDispatcher, NotificationJobReceiver,
    NotificationPublisher, NotificationRepository, NotificationService, TaskRepository,
};

#[derive(Default)]
struct StoreState {
    boards: Vec<Board>,
    members: Vec<BoardMember>,
    lists: Vec<BoardList>,
    tasks: Vec<Task>,
    assignees: Vec<(TaskId, UserId)>,
    notifications: Vec<Notification>,
    unknown_users: BTreeSet<UserId>,
}

#[derive(Default)]
pub(crate) struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub(crate) async fn seed_board(&self, owner_id: UserId) -> Board {
        let now = Utc::now();
        let board = Board {
            id: BoardId::new(),
            title: "Launch plan".to_owned(),
            description: None,
            owner_id,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.boards.push(board.clone());
        board
    }

    pub(crate) async fn seed_member(&self, board_id: BoardId, role: BoardRole) -> BoardMember {
        self.seed_member_for(board_id, UserId::new(), role).await
    }

    pub(crate) async fn seed_member_for(
        &self,
        board_id: BoardId,
        user_id: UserId,
        role: BoardRole,
    ) -> BoardMember {
        let member = BoardMember::with_roles(board_id, user_id, [role], Utc::now())
            .unwrap_or_else(|_| unreachable!());
        self.state.lock().await.members.push(member.clone());
        member
    }

    pub(crate) async fn seed_list(&self, board_id: BoardId, title: &str) -> BoardList {
        self.create_list(board_id, title)
            .await
            .unwrap_or_else(|_| unreachable!())
    }

    pub(crate) async fn mark_unknown_user(&self, user_id: UserId) {
        self.state.lock().await.unknown_users.insert(user_id);
    }

    pub(crate) async fn member(&self, board_id: BoardId, member_id: UserId) -> Option<BoardMember> {
        self.state
            .lock()
            .await
            .members
            .iter()
            .find(|member| member.board_id() == board_id && member.member_id() == member_id)
            .cloned()
    }

    pub(crate) async fn notifications(&self) -> Vec<Notification> {
        self.state.lock().await.notifications.clone()
    }
}

#[async_trait]
impl BoardMemberRepository for InMemoryStore {
    async fn find_standing(
        &self,
        board_id: BoardId,
        user_id: UserId,
    ) -> AppResult<Option<BoardStanding>> {
        let state = self.state.lock().await;
        let Some(board) = state.boards.iter().find(|board| board.id == board_id) else {
            return Ok(None);
        };

        Ok(Some(BoardStanding {
            board: board.clone(),
            membership: state
                .members
                .iter()
                .find(|member| member.board_id() == board_id && member.member_id() == user_id)
                .cloned(),
        }))
    }

    async fn find_member(
        &self,
        board_id: BoardId,
        member_id: UserId,
    ) -> AppResult<Option<BoardMember>> {
        Ok(self.member(board_id, member_id).await)
    }

    async fn list_members(&self, board_id: BoardId) -> AppResult<Vec<BoardMember>> {
        Ok(self
            .state
            .lock()
            .await
            .members
            .iter()
            .filter(|member| member.board_id() == board_id)
            .cloned()
            .collect())
    }

    async fn add_members(
        &self,
        board_id: BoardId,
        members: Vec<BoardMember>,
    ) -> AppResult<Vec<BoardMember>> {
        let mut state = self.state.lock().await;
        if let Some(unknown) = members
            .iter()
            .find(|member| state.unknown_users.contains(&member.member_id()))
        {
            return Err(AppError::Validation(format!(
                "user '{}' does not exist",
                unknown.member_id()
            )));
        }

        let mut inserted = Vec::new();
        for member in members {
            let exists = state.members.iter().any(|existing| {
                existing.board_id() == board_id && existing.member_id() == member.member_id()
            });
            if !exists {
                state.members.push(member.clone());
                inserted.push(member);
            }
        }

        Ok(inserted)
    }

    async fn save_member(&self, member: &BoardMember) -> AppResult<BoardMember> {
        let mut state = self.state.lock().await;
        let stored = state
            .members
            .iter_mut()
            .find(|existing| {
                existing.board_id() == member.board_id()
                    && existing.member_id() == member.member_id()
            })
            .ok_or_else(|| AppError::NotFound("member not found".to_owned()))?;
        *stored = member.clone();
        Ok(member.clone())
    }

    async fn remove_members(
        &self,
        board_id: BoardId,
        member_ids: &[UserId],
    ) -> AppResult<Vec<UserId>> {
        let mut state = self.state.lock().await;
        let removed: Vec<UserId> = state
            .members
            .iter()
            .filter(|member| {
                member.board_id() == board_id && member_ids.contains(&member.member_id())
            })
            .map(BoardMember::member_id)
            .collect();
        state.members.retain(|member| {
            member.board_id() != board_id || !removed.contains(&member.member_id())
        });
        Ok(removed)
    }

    async fn list_member_ids(&self, board_id: BoardId) -> AppResult<Vec<UserId>> {
        let state = self.state.lock().await;
        let owner = state
            .boards
            .iter()
            .filter(|board| board.id == board_id)
            .map(|board| board.owner_id);
        let members = state
            .members
            .iter()
            .filter(|member| member.board_id() == board_id)
            .map(BoardMember::member_id);
        Ok(owner.chain(members).collect())
    }

    async fn list_owner_and_manager_ids(&self, board_id: BoardId) -> AppResult<Vec<UserId>> {
        let state = self.state.lock().await;
        let owner = state
            .boards
            .iter()
            .filter(|board| board.id == board_id)
            .map(|board| board.owner_id);
        let managers = state
            .members
            .iter()
            .filter(|member| member.board_id() == board_id && member.has_role(BoardRole::Manager))
            .map(BoardMember::member_id);
        Ok(owner.chain(managers).collect())
    }

    async fn list_task_assignee_ids(&self, task_id: TaskId) -> AppResult<Vec<UserId>> {
        Ok(self
            .state
            .lock()
            .await
            .assignees
            .iter()
            .filter(|(assigned_task, _)| *assigned_task == task_id)
            .map(|(_, user_id)| *user_id)
            .collect())
    }
}

#[async_trait]
impl BoardRepository for InMemoryStore {
    async fn create_board(&self, board: Board) -> AppResult<Board> {
        self.state.lock().await.boards.push(board.clone());
        Ok(board)
    }

    async fn find_board(&self, board_id: BoardId) -> AppResult<Option<Board>> {
        Ok(self
            .state
            .lock()
            .await
            .boards
            .iter()
            .find(|board| board.id == board_id)
            .cloned())
    }

    async fn list_boards_for_user(&self, user_id: UserId) -> AppResult<Vec<Board>> {
        let state = self.state.lock().await;
        Ok(state
            .boards
            .iter()
            .filter(|board| {
                board.owner_id == user_id
                    || state.members.iter().any(|member| {
                        member.board_id() == board.id && member.member_id() == user_id
                    })
            })
            .cloned()
            .collect())
    }

    async fn update_board(&self, board: &Board) -> AppResult<Board> {
        let mut state = self.state.lock().await;
        let stored = state
            .boards
            .iter_mut()
            .find(|existing| existing.id == board.id)
            .ok_or_else(|| AppError::NotFound("board not found".to_owned()))?;
        *stored = board.clone();
        Ok(board.clone())
    }

    async fn delete_board(&self, board_id: BoardId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let removed_tasks: Vec<TaskId> = state
            .tasks
            .iter()
            .filter(|task| task.board_id == board_id)
            .map(|task| task.id)
            .collect();
        state.boards.retain(|board| board.id != board_id);
        state.members.retain(|member| member.board_id() != board_id);
        state.lists.retain(|list| list.board_id != board_id);
        state.tasks.retain(|task| task.board_id != board_id);
        state
            .assignees
            .retain(|(task_id, _)| !removed_tasks.contains(task_id));
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn create_list(&self, board_id: BoardId, title: &str) -> AppResult<BoardList> {
        let mut state = self.state.lock().await;
        let position = state
            .lists
            .iter()
            .filter(|list| list.board_id == board_id)
            .count();
        let list = BoardList {
            id: ListId::new(),
            board_id,
            title: title.to_owned(),
            position: i32::try_from(position).unwrap_or(i32::MAX),
            created_at: Utc::now(),
        };
        state.lists.push(list.clone());
        Ok(list)
    }

    async fn find_list(
        &self,
        board_id: BoardId,
        list_id: ListId,
    ) -> AppResult<Option<BoardList>> {
        Ok(self
            .state
            .lock()
            .await
            .lists
            .iter()
            .find(|list| list.board_id == board_id && list.id == list_id)
            .cloned())
    }

    async fn list_lists(&self, board_id: BoardId) -> AppResult<Vec<BoardList>> {
        let mut lists: Vec<BoardList> = self
            .state
            .lock()
            .await
            .lists
            .iter()
            .filter(|list| list.board_id == board_id)
            .cloned()
            .collect();
        lists.sort_by_key(|list| list.position);
        Ok(lists)
    }

    async fn rename_list(
        &self,
        board_id: BoardId,
        list_id: ListId,
        title: &str,
    ) -> AppResult<BoardList> {
        let mut state = self.state.lock().await;
        let list = state
            .lists
            .iter_mut()
            .find(|list| list.board_id == board_id && list.id == list_id)
            .ok_or_else(|| AppError::NotFound("list not found".to_owned()))?;
        list.title = title.to_owned();
        Ok(list.clone())
    }

    async fn delete_list(&self, board_id: BoardId, list_id: ListId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .lists
            .retain(|list| list.board_id != board_id || list.id != list_id);
        state.tasks.retain(|task| task.list_id != list_id);
        Ok(())
    }

    async fn create_task(&self, task: Task) -> AppResult<Task> {
        self.state.lock().await.tasks.push(task.clone());
        Ok(task)
    }

    async fn find_task(&self, board_id: BoardId, task_id: TaskId) -> AppResult<Option<Task>> {
        Ok(self
            .state
            .lock()
            .await
            .tasks
            .iter()
            .find(|task| task.board_id == board_id && task.id == task_id)
            .cloned())
    }

    async fn list_tasks(&self, board_id: BoardId, list_id: ListId) -> AppResult<Vec<Task>> {
        Ok(self
            .state
            .lock()
            .await
            .tasks
            .iter()
            .filter(|task| task.board_id == board_id && task.list_id == list_id)
            .cloned()
            .collect())
    }

    async fn save_task(&self, task: &Task) -> AppResult<Task> {
        let mut state = self.state.lock().await;
        let stored = state
            .tasks
            .iter_mut()
            .find(|existing| existing.id == task.id)
            .ok_or_else(|| AppError::NotFound("task not found".to_owned()))?;
        *stored = task.clone();
        Ok(task.clone())
    }

    async fn delete_task(&self, board_id: BoardId, task_id: TaskId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .tasks
            .retain(|task| task.board_id != board_id || task.id != task_id);
        state.assignees.retain(|(assigned, _)| *assigned != task_id);
        Ok(())
    }

    async fn add_task_assignees(
        &self,
        task_id: TaskId,
        member_ids: &[UserId],
    ) -> AppResult<Vec<UserId>> {
        let mut state = self.state.lock().await;
        let mut inserted = Vec::new();
        for member_id in member_ids {
            if !state.assignees.contains(&(task_id, *member_id)) {
                state.assignees.push((task_id, *member_id));
                inserted.push(*member_id);
            }
        }
        Ok(inserted)
    }

    async fn remove_task_assignees(
        &self,
        task_id: TaskId,
        member_ids: &[UserId],
    ) -> AppResult<Vec<UserId>> {
        let mut state = self.state.lock().await;
        let removed: Vec<UserId> = member_ids
            .iter()
            .copied()
            .filter(|member_id| state.assignees.contains(&(task_id, *member_id)))
            .collect();
        state.assignees.retain(|(assigned, member_id)| {
            *assigned != task_id || !removed.contains(member_id)
        });
        Ok(removed)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn insert_notifications(&self, notifications: &[Notification]) -> AppResult<()> {
        self.state
            .lock()
            .await
            .notifications
            .extend_from_slice(notifications);
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> AppResult<Vec<Notification>> {
        Ok(self
            .state
            .lock()
            .await
            .notifications
            .iter()
            .rev()
            .filter(|notification| notification.user_id == user_id)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_for_user(&self, user_id: UserId) -> AppResult<u64> {
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .iter()
            .filter(|notification| notification.user_id == user_id)
            .count() as u64)
    }

    async fn count_unread_for_user(&self, user_id: UserId) -> AppResult<u64> {
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .iter()
            .filter(|notification| notification.user_id == user_id && !notification.is_read)
            .count() as u64)
    }

    async fn find_notification(
        &self,
        notification_id: NotificationId,
    ) -> AppResult<Option<Notification>> {
        Ok(self
            .state
            .lock()
            .await
            .notifications
            .iter()
            .find(|notification| notification.id == notification_id)
            .cloned())
    }

    async fn mark_read(&self, notification_id: NotificationId) -> AppResult<Option<Notification>> {
        let mut state = self.state.lock().await;
        Ok(state
            .notifications
            .iter_mut()
            .find(|notification| notification.id == notification_id)
            .map(|notification| {
                notification.is_read = true;
                notification.clone()
            }))
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let mut flipped = 0;
        for notification in state
            .notifications
            .iter_mut()
            .filter(|notification| notification.user_id == user_id && !notification.is_read)
        {
            notification.is_read = true;
            flipped += 1;
        }
        Ok(flipped)
    }
}

#[derive(Default)]
pub(crate) struct RecordingPublisher {
    published: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingPublisher {
    pub(crate) fn failing() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) async fn published(&self) -> Vec<Notification> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish(&self, notifications: &[Notification]) -> AppResult<usize> {
        if self.fail {
            return Err(AppError::Internal("realtime channel unavailable".to_owned()));
        }

        self.published
            .lock()
            .await
            .extend_from_slice(notifications);
        Ok(notifications.len())
    }
}

/// Services wired against one in-memory store with a manually drained queue.
pub(crate) struct Harness {
    pub(crate) store: Arc<InMemoryStore>,
    pub(crate) publisher: Arc<RecordingPublisher>,
    pub(crate) access: BoardAccessService,
    pub(crate) members: BoardMemberService,
    pub(crate) boards: BoardService,
    pub(crate) notifications: NotificationService,
    receiver: NotificationJobReceiver,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_publisher(RecordingPublisher::default())
    }

    pub(crate) fn with_publisher(publisher: RecordingPublisher) -> Self {
        let store = Arc::new(InMemoryStore::default());
        let publisher = Arc::new(publisher);
        let (dispatcher, receiver) = NotificationDispatcher::channel();
        let access = BoardAccessService::new(store.clone());
        let members = BoardMemberService::new(access.clone(), store.clone(), dispatcher.clone());
        let boards = BoardService::new(
            access.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            dispatcher,
        );
        let notifications = NotificationService::new(store.clone(), store.clone(), publisher.clone());

        Self {
            store,
            publisher,
            access,
            members,
            boards,
            notifications,
            receiver,
        }
    }

    /// Delivers every queued job and returns the notifications produced.
    pub(crate) async fn drain(&mut self) -> Vec<Notification> {
        let mut delivered = Vec::new();
        while let Some(job) = self.receiver.try_recv() {
            let notifications = self
                .notifications
                .deliver(job)
                .await
                .unwrap_or_else(|_| unreachable!());
            delivered.extend(notifications);
        }
        delivered
    }
}

pub(crate) fn identity(user_id: UserId) -> UserIdentity {
    UserIdentity::new(user_id, format!("user_{user_id}"), None)
}
