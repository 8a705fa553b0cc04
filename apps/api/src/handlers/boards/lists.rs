use super::*;

pub async fn list_lists_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(board_id): Path<BoardId>,
) -> ApiResult<Json<Vec<ListResponse>>> {
    let lists = state
        .board_service
        .list_lists(&user, board_id)
        .await?
        .into_iter()
        .map(ListResponse::from)
        .collect();

    Ok(Json(lists))
}

pub async fn create_list_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(board_id): Path<BoardId>,
    Json(payload): Json<CreateListRequest>,
) -> ApiResult<(StatusCode, Json<ListResponse>)> {
    let list = state
        .board_service
        .create_list(&user, board_id, payload.title.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(ListResponse::from(list))))
}

pub async fn rename_list_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, list_id)): Path<(BoardId, ListId)>,
    Json(payload): Json<RenameListRequest>,
) -> ApiResult<Json<ListResponse>> {
    let list = state
        .board_service
        .rename_list(&user, board_id, list_id, payload.title.as_str())
        .await?;

    Ok(Json(ListResponse::from(list)))
}

pub async fn delete_list_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, list_id)): Path<(BoardId, ListId)>,
) -> ApiResult<StatusCode> {
    state
        .board_service
        .delete_list(&user, board_id, list_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
