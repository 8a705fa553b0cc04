use super::*;

pub async fn list_tasks_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, list_id)): Path<(BoardId, ListId)>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = state
        .board_service
        .list_tasks(&user, board_id, list_id)
        .await?
        .into_iter()
        .map(TaskResponse::from)
        .collect();

    Ok(Json(tasks))
}

pub async fn create_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, list_id)): Path<(BoardId, ListId)>,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let input = payload.into_input(list_id)?;
    let task = state
        .board_service
        .create_task(&user, board_id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

pub async fn get_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, task_id)): Path<(BoardId, TaskId)>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state
        .board_service
        .get_task(&user, board_id, task_id)
        .await?;

    Ok(Json(TaskResponse::from(task)))
}

pub async fn update_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, task_id)): Path<(BoardId, TaskId)>,
    Json(payload): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state
        .board_service
        .update_task(&user, board_id, task_id, payload.into_input()?)
        .await?;

    Ok(Json(TaskResponse::from(task)))
}

pub async fn assign_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, task_id)): Path<(BoardId, TaskId)>,
    Json(payload): Json<MemberIdsRequest>,
) -> ApiResult<Json<MemberIdsResponse>> {
    let assigned = state
        .board_service
        .assign_task(&user, board_id, task_id, payload.user_ids()?)
        .await?;

    Ok(Json(MemberIdsResponse::from(assigned)))
}

pub async fn unassign_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, task_id)): Path<(BoardId, TaskId)>,
    Json(payload): Json<MemberIdsRequest>,
) -> ApiResult<Json<MemberIdsResponse>> {
    let removed = state
        .board_service
        .unassign_task(&user, board_id, task_id, payload.user_ids()?)
        .await?;

    Ok(Json(MemberIdsResponse::from(removed)))
}

pub async fn update_task_status_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, task_id)): Path<(BoardId, TaskId)>,
    Json(payload): Json<UpdateTaskStatusRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state
        .board_service
        .update_task_status(&user, board_id, task_id, payload.parsed_status()?)
        .await?;

    Ok(Json(TaskResponse::from(task)))
}

pub async fn move_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, task_id)): Path<(BoardId, TaskId)>,
    Json(payload): Json<MoveTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state
        .board_service
        .move_task(&user, board_id, task_id, payload.parsed_list_id()?)
        .await?;

    Ok(Json(TaskResponse::from(task)))
}

pub async fn delete_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((board_id, task_id)): Path<(BoardId, TaskId)>,
) -> ApiResult<StatusCode> {
    state
        .board_service
        .delete_task(&user, board_id, task_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
