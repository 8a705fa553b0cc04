use chrono::{TimeZone, Utc};
use serde_json::json;
use tasklane_core::{AppError, BoardId, ListId, NotificationId, UserId};
use tasklane_domain::{BoardPermission, BoardRole, Notification, NotificationType, TaskStatus};
use ts_rs::Config;
use ts_rs::TS;

use super::{
    AuthResponse, BoardAccessResponse, BoardMemberResponse, BoardResponse, CreateBoardRequest,
    CreateListRequest, CreateTaskRequest, HealthResponse, ListResponse, LoginRequest,
    MarkAllReadResponse, MemberIdsRequest, MemberIdsResponse, MoveTaskRequest,
    NotificationPageResponse, NotificationResponse, RegisterRequest, RenameListRequest,
    TaskResponse, UpdateBoardRequest, UpdateMemberPermissionsRequest, UpdateMemberRolesRequest,
    UpdateTaskRequest, UpdateTaskStatusRequest, UserResponse,
};
use crate::error::ErrorResponse;

#[test]
fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
    let config = Config::default();

    RegisterRequest::export(&config)?;
    LoginRequest::export(&config)?;
    AuthResponse::export(&config)?;
    UserResponse::export(&config)?;
    HealthResponse::export(&config)?;
    CreateBoardRequest::export(&config)?;
    UpdateBoardRequest::export(&config)?;
    BoardResponse::export(&config)?;
    BoardAccessResponse::export(&config)?;
    MemberIdsRequest::export(&config)?;
    MemberIdsResponse::export(&config)?;
    UpdateMemberRolesRequest::export(&config)?;
    UpdateMemberPermissionsRequest::export(&config)?;
    BoardMemberResponse::export(&config)?;
    CreateListRequest::export(&config)?;
    RenameListRequest::export(&config)?;
    ListResponse::export(&config)?;
    CreateTaskRequest::export(&config)?;
    UpdateTaskRequest::export(&config)?;
    UpdateTaskStatusRequest::export(&config)?;
    MoveTaskRequest::export(&config)?;
    TaskResponse::export(&config)?;
    NotificationResponse::export(&config)?;
    NotificationPageResponse::export(&config)?;
    MarkAllReadResponse::export(&config)?;
    ErrorResponse::export(&config)?;

    Ok(())
}

#[test]
fn notification_response_uses_persisted_wire_names() {
    let board_id = BoardId::new();
    let user_id = UserId::new();
    let notification = Notification {
        id: NotificationId::new(),
        user_id,
        reference_id: Some(board_id.as_uuid()),
        notification_type: NotificationType::TaskMoved,
        message: NotificationType::TaskMoved.default_message().to_owned(),
        data: Some(json!({ "taskId": "t-1" })),
        is_read: false,
        created_at: Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
            .single()
            .unwrap_or_else(|| unreachable!()),
    };

    let value = serde_json::to_value(NotificationResponse::from(notification))
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(value["userId"], json!(user_id.to_string()));
    assert_eq!(value["referenceId"], json!(board_id.to_string()));
    assert_eq!(value["type"], json!("TASK_MOVED"));
    assert_eq!(value["isRead"], json!(false));
    assert_eq!(value["createdAt"], json!("2026-03-01T09:30:00+00:00"));
    assert_eq!(value["data"]["taskId"], json!("t-1"));
}

#[test]
fn login_accepts_email_or_username_keys() {
    let by_email: LoginRequest = serde_json::from_value(json!({
        "email": "jordan@example.com",
        "password": "secret"
    }))
    .unwrap_or_else(|_| unreachable!());
    let by_username: LoginRequest = serde_json::from_value(json!({
        "username": "jordan_k",
        "password": "secret"
    }))
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(by_email.identifier, "jordan@example.com");
    assert_eq!(by_username.identifier, "jordan_k");
}

#[test]
fn member_requests_parse_wire_values() {
    let member = UserId::new();
    let ids: MemberIdsRequest = serde_json::from_value(json!({
        "memberIds": [member.to_string()]
    }))
    .unwrap_or_else(|_| unreachable!());
    assert_eq!(ids.user_ids().unwrap_or_else(|_| unreachable!()), vec![member]);

    let roles = UpdateMemberRolesRequest {
        roles: vec!["MANAGER".to_owned(), "VIEWER".to_owned()],
    };
    assert_eq!(
        roles.parsed_roles().unwrap_or_else(|_| unreachable!()),
        vec![BoardRole::Manager, BoardRole::Viewer]
    );

    let permissions = UpdateMemberPermissionsRequest {
        permissions: vec!["TASK_MOVE".to_owned()],
    };
    assert_eq!(
        permissions
            .parsed_permissions()
            .unwrap_or_else(|_| unreachable!()),
        vec![BoardPermission::TaskMove]
    );
}

#[test]
fn malformed_wire_values_are_validation_errors() {
    let ids = MemberIdsRequest {
        member_ids: vec!["not-a-uuid".to_owned()],
    };
    assert!(matches!(ids.user_ids(), Err(AppError::Validation(_))));

    let roles = UpdateMemberRolesRequest {
        roles: vec!["OWNER_PLUS".to_owned()],
    };
    assert!(matches!(roles.parsed_roles(), Err(AppError::Validation(_))));

    let status = UpdateTaskStatusRequest {
        status: "ARCHIVED".to_owned(),
    };
    assert!(matches!(
        status.parsed_status(),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn task_request_parses_due_date() {
    let list_id = ListId::new();
    let request: CreateTaskRequest = serde_json::from_value(json!({
        "title": "Ship beta",
        "dueDate": "2026-04-01T12:00:00Z"
    }))
    .unwrap_or_else(|_| unreachable!());

    let input = request
        .into_input(list_id)
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(input.list_id, list_id);
    assert_eq!(
        input.due_date.map(|value| value.to_rfc3339()),
        Some("2026-04-01T12:00:00+00:00".to_owned())
    );

    let invalid = CreateTaskRequest {
        title: "Ship beta".to_owned(),
        description: None,
        due_date: Some("next tuesday".to_owned()),
    };
    assert!(matches!(
        invalid.into_input(list_id),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn status_request_accepts_known_statuses() {
    let status = UpdateTaskStatusRequest {
        status: " IN_PROGRESS ".to_owned(),
    };
    assert_eq!(
        status.parsed_status().unwrap_or_else(|_| unreachable!()),
        TaskStatus::InProgress
    );
}

#[test]
fn task_edit_request_distinguishes_absent_and_cleared_fields() {
    let request: UpdateTaskRequest = serde_json::from_value(json!({
        "description": "",
        "dueDate": " "
    }))
    .unwrap_or_else(|_| unreachable!());

    let input = request.into_input().unwrap_or_else(|_| unreachable!());
    assert_eq!(input.title, None);
    assert_eq!(input.description, Some(Some(String::new())));
    assert_eq!(input.due_date, Some(None));

    let rescheduled: UpdateTaskRequest = serde_json::from_value(json!({
        "dueDate": "2026-11-02T09:30:00Z"
    }))
    .unwrap_or_else(|_| unreachable!());
    let input = rescheduled.into_input().unwrap_or_else(|_| unreachable!());
    assert_eq!(input.description, None);
    assert_eq!(
        input.due_date.flatten().map(|value| value.to_rfc3339()),
        Some("2026-11-02T09:30:00+00:00".to_owned())
    );

    let invalid = UpdateTaskRequest {
        due_date: Some("tomorrow-ish".to_owned()),
        ..UpdateTaskRequest::default()
    };
    assert!(matches!(invalid.into_input(), Err(AppError::Validation(_))));
}
