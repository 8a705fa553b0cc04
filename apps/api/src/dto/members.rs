use serde::{Deserialize, Serialize};
use tasklane_core::AppResult;
use tasklane_domain::{BoardMember, BoardPermission, BoardRole};
use ts_rs::TS;

use super::common::parse_all;

/// Replacement role set for one board member.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-member-roles-request.ts"
)]
pub struct UpdateMemberRolesRequest {
    pub roles: Vec<String>,
}

impl UpdateMemberRolesRequest {
    pub fn parsed_roles(&self) -> AppResult<Vec<BoardRole>> {
        parse_all(&self.roles)
    }
}

/// Replacement permission set for one board member.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-member-permissions-request.ts"
)]
pub struct UpdateMemberPermissionsRequest {
    pub permissions: Vec<String>,
}

impl UpdateMemberPermissionsRequest {
    pub fn parsed_permissions(&self) -> AppResult<Vec<BoardPermission>> {
        parse_all(&self.permissions)
    }
}

/// API representation of a board membership.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/board-member-response.ts"
)]
pub struct BoardMemberResponse {
    pub board_id: String,
    pub member_id: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BoardMember> for BoardMemberResponse {
    fn from(member: BoardMember) -> Self {
        Self {
            board_id: member.board_id().to_string(),
            member_id: member.member_id().to_string(),
            roles: member
                .roles()
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
            permissions: member
                .permissions()
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            created_at: member.created_at().to_rfc3339(),
            updated_at: member.updated_at().to_rfc3339(),
        }
    }
}
