use super::*;

pub async fn list_boards_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<BoardResponse>>> {
    let boards = state
        .board_service
        .list_boards(&user)
        .await?
        .into_iter()
        .map(BoardResponse::from)
        .collect();

    Ok(Json(boards))
}

pub async fn create_board_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<BoardResponse>)> {
    let board = state
        .board_service
        .create_board(&user, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(BoardResponse::from(board))))
}

pub async fn get_board_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(board_id): Path<BoardId>,
) -> ApiResult<Json<BoardResponse>> {
    let board = state.board_service.get_board(&user, board_id).await?;
    Ok(Json(BoardResponse::from(board)))
}

pub async fn update_board_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(board_id): Path<BoardId>,
    Json(payload): Json<UpdateBoardRequest>,
) -> ApiResult<Json<BoardResponse>> {
    let board = state
        .board_service
        .update_board(&user, board_id, payload.into())
        .await?;

    Ok(Json(BoardResponse::from(board)))
}

pub async fn delete_board_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(board_id): Path<BoardId>,
) -> ApiResult<StatusCode> {
    state.board_service.delete_board(&user, board_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the caller's roles and effective permissions on the board.
pub async fn board_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(board_id): Path<BoardId>,
) -> ApiResult<Json<BoardAccessResponse>> {
    let access = state
        .board_access_service
        .require_board_membership(&user, board_id)
        .await?;

    Ok(Json(BoardAccessResponse::from(access)))
}
