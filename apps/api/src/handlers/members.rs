use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tasklane_core::{BoardId, UserId, UserIdentity};

use crate::dto::{
    BoardMemberResponse, MemberIdsRequest, MemberIdsResponse, UpdateMemberPermissionsRequest,
    UpdateMemberRolesRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn add_members_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(board_id): Path<BoardId>,
    Json(payload): Json<MemberIdsRequest>,
) -> ApiResult<(StatusCode, Json<Vec<BoardMemberResponse>>)> {
    let inserted = state
        .board_member_service
        .add_members(&user, board_id, payload.user_ids()?)
        .await?
        .into_iter()
        .map(BoardMemberResponse::from)
        .collect();

    Ok((StatusCode::CREATED, Json(inserted)))
}

pub async fn list_members_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(board_id): Path<BoardId>,
) -> ApiResult<Json<Vec<BoardMemberResponse>>> {
    let members = state
        .board_member_service
        .list_members(&user, board_id)
        .await?
        .into_iter()
        .map(BoardMemberResponse::from)
        .collect();

    Ok(Json(members))
}

pub async fn get_member_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, member_id)): Path<(BoardId, UserId)>,
) -> ApiResult<Json<BoardMemberResponse>> {
    let member = state
        .board_member_service
        .get_member(&user, board_id, member_id)
        .await?;

    Ok(Json(BoardMemberResponse::from(member)))
}

pub async fn update_member_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, member_id)): Path<(BoardId, UserId)>,
    Json(payload): Json<UpdateMemberRolesRequest>,
) -> ApiResult<Json<BoardMemberResponse>> {
    let member = state
        .board_member_service
        .update_member_roles(&user, board_id, member_id, payload.parsed_roles()?)
        .await?;

    Ok(Json(BoardMemberResponse::from(member)))
}

pub async fn update_member_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, member_id)): Path<(BoardId, UserId)>,
    Json(payload): Json<UpdateMemberPermissionsRequest>,
) -> ApiResult<Json<BoardMemberResponse>> {
    let member = state
        .board_member_service
        .update_member_permissions(&user, board_id, member_id, payload.parsed_permissions()?)
        .await?;

    Ok(Json(BoardMemberResponse::from(member)))
}

pub async fn remove_members_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(board_id): Path<BoardId>,
    Json(payload): Json<MemberIdsRequest>,
) -> ApiResult<Json<MemberIdsResponse>> {
    let removed = state
        .board_member_service
        .remove_members(&user, board_id, payload.user_ids()?)
        .await?;

    Ok(Json(MemberIdsResponse::from(removed)))
}
