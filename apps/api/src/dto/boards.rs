use serde::{Deserialize, Serialize};
use tasklane_application::{BoardAccess, CreateBoardInput, UpdateBoardInput};
use tasklane_domain::Board;
use ts_rs::TS;

/// Incoming payload for board creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-board-request.ts"
)]
pub struct CreateBoardRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateBoardRequest> for CreateBoardInput {
    fn from(request: CreateBoardRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
        }
    }
}

/// Incoming payload for board updates. A blank description clears it.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-board-request.ts"
)]
pub struct UpdateBoardRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<UpdateBoardRequest> for UpdateBoardInput {
    fn from(request: UpdateBoardRequest) -> Self {
        Self {
            title: request.title,
            description: request.description.map(Some),
        }
    }
}

/// API representation of a board.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/board-response.ts"
)]
pub struct BoardResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Board> for BoardResponse {
    fn from(board: Board) -> Self {
        Self {
            id: board.id.to_string(),
            title: board.title,
            description: board.description,
            owner_id: board.owner_id.to_string(),
            created_at: board.created_at.to_rfc3339(),
            updated_at: board.updated_at.to_rfc3339(),
        }
    }
}

/// Effective standing of the caller on one board.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/board-access-response.ts"
)]
pub struct BoardAccessResponse {
    pub board_id: String,
    pub is_owner: bool,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl From<BoardAccess> for BoardAccessResponse {
    fn from(access: BoardAccess) -> Self {
        Self {
            board_id: access.board_id().to_string(),
            is_owner: access.is_owner,
            roles: access
                .roles()
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
            permissions: access
                .permissions
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
        }
    }
}
