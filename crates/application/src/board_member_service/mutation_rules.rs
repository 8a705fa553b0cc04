use std::collections::BTreeSet;

use tasklane_core::{AppError, AppResult, UserId};
use tasklane_domain::{BoardMember, BoardPermission};

use crate::BoardAccess;

/// Rejects a non-owner actor targeting their own membership.
pub(super) fn ensure_not_self(access: &BoardAccess, target_id: UserId) -> AppResult<()> {
    if !access.is_owner && access.user_id == target_id {
        return Err(AppError::Forbidden(
            "you cannot change your own board membership".to_owned(),
        ));
    }

    Ok(())
}

/// Rejects targets whose highest role rank is equal to or above the actor's.
pub(super) fn ensure_outranks(access: &BoardAccess, target: &BoardMember) -> AppResult<()> {
    let actor_rank = access.rank();
    let target_rank = target.highest_rank();

    if target_rank >= actor_rank {
        return Err(AppError::Forbidden(format!(
            "cannot modify member '{}' whose role rank {target_rank} is not below yours ({actor_rank})",
            target.member_id()
        )));
    }

    Ok(())
}

/// Rejects requested permissions that the target's roles do not grant.
pub(super) fn ensure_within_role_scope(
    target: &BoardMember,
    requested: &BTreeSet<BoardPermission>,
) -> AppResult<()> {
    let allowed = target.role_permissions();
    let invalid: Vec<&'static str> = requested
        .difference(&allowed)
        .map(BoardPermission::as_str)
        .collect();

    if !invalid.is_empty() {
        return Err(AppError::Forbidden(format!(
            "permissions not granted by the member's roles: {}",
            invalid.join(", ")
        )));
    }

    Ok(())
}
