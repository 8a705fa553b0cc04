use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tasklane_core::{BoardId, ListId, TaskId, UserIdentity};

use crate::dto::{
    BoardAccessResponse, BoardResponse, CreateBoardRequest, CreateListRequest, CreateTaskRequest,
    ListResponse, MemberIdsRequest, MemberIdsResponse, MoveTaskRequest, RenameListRequest,
    TaskResponse, UpdateBoardRequest, UpdateTaskRequest, UpdateTaskStatusRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod board;
mod lists;
mod tasks;

pub use board::{
    board_access_handler, create_board_handler, delete_board_handler, get_board_handler,
    list_boards_handler, update_board_handler,
};
pub use lists::{
    create_list_handler, delete_list_handler, list_lists_handler, rename_list_handler,
};
pub use tasks::{
    assign_task_handler, create_task_handler, delete_task_handler, get_task_handler,
    list_tasks_handler, move_task_handler, unassign_task_handler, update_task_handler,
    update_task_status_handler,
};
