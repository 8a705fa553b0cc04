use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tasklane_application::UserRecord;
use tasklane_core::{AppError, AppResult, UserId};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of a registered user.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Batch of user ids addressed by a member or assignee operation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/member-ids-request.ts"
)]
pub struct MemberIdsRequest {
    pub member_ids: Vec<String>,
}

impl MemberIdsRequest {
    /// Parses every id, failing on the first malformed value.
    pub fn user_ids(&self) -> AppResult<Vec<UserId>> {
        parse_all(&self.member_ids)
    }
}

/// User ids affected by a member or assignee operation.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/member-ids-response.ts"
)]
pub struct MemberIdsResponse {
    pub member_ids: Vec<String>,
}

impl From<Vec<UserId>> for MemberIdsResponse {
    fn from(ids: Vec<UserId>) -> Self {
        Self {
            member_ids: ids.into_iter().map(|id| id.to_string()).collect(),
        }
    }
}

pub(super) fn parse_all<T>(values: &[String]) -> AppResult<Vec<T>>
where
    T: FromStr<Err = AppError>,
{
    values.iter().map(|value| value.trim().parse::<T>()).collect()
}
