//! Board membership management and role/permission mutation rules.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tasklane_core::{AppError, AppResult, BoardId, UserId, UserIdentity};
use tasklane_domain::{
    BoardMember, BoardPermission, BoardRole, NotificationDraft, NotificationType,
};

use crate::{BoardAccessService, BoardMemberRepository, NotificationDispatcher};

mod mutation_rules;

use mutation_rules::{ensure_not_self, ensure_outranks, ensure_within_role_scope};

/// Application service for board member administration.
#[derive(Clone)]
pub struct BoardMemberService {
    access: BoardAccessService,
    repository: Arc<dyn BoardMemberRepository>,
    notifications: NotificationDispatcher,
}

impl BoardMemberService {
    /// Creates a new board member service.
    #[must_use]
    pub fn new(
        access: BoardAccessService,
        repository: Arc<dyn BoardMemberRepository>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            access,
            repository,
            notifications,
        }
    }

    /// Adds users to a board with the `MEMBER` role.
    ///
    /// Existing members and the owner are skipped. Returns the rows inserted.
    pub async fn add_members(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        member_ids: Vec<UserId>,
    ) -> AppResult<Vec<BoardMember>> {
        let access = self
            .access
            .require_board_permissions(actor, board_id, &[BoardPermission::BoardMembersCreate])
            .await?;

        if member_ids.is_empty() {
            return Err(AppError::Validation(
                "at least one member id is required".to_owned(),
            ));
        }

        let now = Utc::now();
        let candidates: BTreeSet<UserId> = member_ids
            .into_iter()
            .filter(|member_id| !access.board.is_owned_by(*member_id))
            .collect();
        let rows = candidates
            .into_iter()
            .map(|member_id| BoardMember::with_roles(board_id, member_id, [BoardRole::Member], now))
            .collect::<AppResult<Vec<_>>>()?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let inserted = self.repository.add_members(board_id, rows).await?;
        if inserted.is_empty() {
            return Ok(inserted);
        }

        let added_ids: Vec<UserId> = inserted.iter().map(BoardMember::member_id).collect();
        let board_data = json!({ "boardId": board_id, "title": access.board.title });
        self.notifications.create_and_send(
            added_ids
                .iter()
                .map(|member_id| {
                    NotificationDraft::new(*member_id, NotificationType::BoardInvite)
                        .with_reference(board_id.as_uuid())
                        .with_data(board_data.clone())
                })
                .collect(),
        );
        self.notifications.notify_board_owner_and_managers(
            board_id,
            actor.user_id(),
            NotificationType::MemberAdded,
            Some(json!({ "boardId": board_id, "memberIds": added_ids })),
        );

        Ok(inserted)
    }

    /// Lists board members. Requires standing on the board.
    pub async fn list_members(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
    ) -> AppResult<Vec<BoardMember>> {
        self.access
            .require_board_membership(actor, board_id)
            .await?;
        self.repository.list_members(board_id).await
    }

    /// Returns one board member. Requires standing on the board.
    pub async fn get_member(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        member_id: UserId,
    ) -> AppResult<BoardMember> {
        self.access
            .require_board_membership(actor, board_id)
            .await?;
        self.find_member(board_id, member_id).await
    }

    /// Replaces a member's roles and resets permissions to the role-derived set.
    pub async fn update_member_roles(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        member_id: UserId,
        roles: Vec<BoardRole>,
    ) -> AppResult<BoardMember> {
        let access = self
            .access
            .require_board_permissions(
                actor,
                board_id,
                &[BoardPermission::BoardMembersRoleUpdate],
            )
            .await?;
        ensure_not_self(&access, member_id)?;

        if roles.is_empty() {
            return Err(AppError::Validation(
                "at least one role is required".to_owned(),
            ));
        }
        if roles.contains(&BoardRole::Owner) {
            return Err(AppError::Forbidden(
                "the OWNER role belongs to the board owner and cannot be assigned".to_owned(),
            ));
        }

        let mut member = self.find_member(board_id, member_id).await?;
        member.assign_roles(roles, Utc::now())?;
        let member = self.repository.save_member(&member).await?;

        let role_names: Vec<&'static str> = member.roles().iter().map(BoardRole::as_str).collect();
        self.notifications.create_and_send(vec![
            NotificationDraft::new(member_id, NotificationType::BoardRoleUpdated)
                .with_reference(board_id.as_uuid())
                .with_data(json!({ "boardId": board_id, "roles": role_names })),
        ]);
        self.notifications.notify_board_owner_and_managers_except(
            board_id,
            vec![actor.user_id(), member_id],
            NotificationType::MemberRoleUpdated,
            Some(json!({ "boardId": board_id, "memberId": member_id, "roles": role_names })),
        );

        Ok(member)
    }

    /// Replaces a member's permission set within the limits of their roles.
    pub async fn update_member_permissions(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        member_id: UserId,
        permissions: Vec<BoardPermission>,
    ) -> AppResult<BoardMember> {
        let access = self
            .access
            .require_board_permissions(
                actor,
                board_id,
                &[BoardPermission::BoardMembersPermissionUpdate],
            )
            .await?;
        ensure_not_self(&access, member_id)?;

        if permissions.is_empty() {
            return Err(AppError::Validation(
                "at least one permission is required".to_owned(),
            ));
        }

        let mut member = self.find_member(board_id, member_id).await?;
        ensure_outranks(&access, &member)?;

        let requested: BTreeSet<BoardPermission> = permissions.into_iter().collect();
        ensure_within_role_scope(&member, &requested)?;

        member.set_permissions(requested, Utc::now());
        let member = self.repository.save_member(&member).await?;

        let permission_names: Vec<&'static str> = member
            .permissions()
            .iter()
            .map(BoardPermission::as_str)
            .collect();
        self.notifications.create_and_send(vec![
            NotificationDraft::new(member_id, NotificationType::BoardPermissionsUpdated)
                .with_reference(board_id.as_uuid())
                .with_data(json!({ "boardId": board_id, "permissions": permission_names })),
        ]);
        self.notifications.notify_board_owner_and_managers_except(
            board_id,
            vec![actor.user_id(), member_id],
            NotificationType::MemberPermissionUpdated,
            Some(json!({
                "boardId": board_id,
                "memberId": member_id,
                "permissions": permission_names,
            })),
        );

        Ok(member)
    }

    /// Removes members from a board. The owner cannot be removed.
    pub async fn remove_members(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        member_ids: Vec<UserId>,
    ) -> AppResult<Vec<UserId>> {
        let access = self
            .access
            .require_board_permissions(actor, board_id, &[BoardPermission::BoardMembersDelete])
            .await?;

        if member_ids.is_empty() {
            return Err(AppError::Validation(
                "at least one member id is required".to_owned(),
            ));
        }

        if member_ids
            .iter()
            .any(|member_id| access.board.is_owned_by(*member_id))
        {
            return Err(AppError::Forbidden(
                "the board owner cannot be removed".to_owned(),
            ));
        }

        for member_id in &member_ids {
            ensure_not_self(&access, *member_id)?;
        }

        let unique_ids: Vec<UserId> = member_ids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let removed = self.repository.remove_members(board_id, &unique_ids).await?;
        if removed.is_empty() {
            return Err(AppError::NotFound(format!(
                "none of the given users are members of board '{board_id}'"
            )));
        }

        let board_data = json!({ "boardId": board_id, "title": access.board.title });
        self.notifications.create_and_send(
            removed
                .iter()
                .map(|member_id| {
                    NotificationDraft::new(*member_id, NotificationType::BoardMemberRemoved)
                        .with_reference(board_id.as_uuid())
                        .with_data(board_data.clone())
                })
                .collect(),
        );
        self.notifications.notify_board_owner_and_managers(
            board_id,
            actor.user_id(),
            NotificationType::MemberRemoved,
            Some(json!({ "boardId": board_id, "memberIds": removed })),
        );

        Ok(removed)
    }

    async fn find_member(&self, board_id: BoardId, member_id: UserId) -> AppResult<BoardMember> {
        self.repository
            .find_member(board_id, member_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "user '{member_id}' is not a member of board '{board_id}'"
                ))
            })
    }
}
