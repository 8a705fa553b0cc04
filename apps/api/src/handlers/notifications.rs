use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use tasklane_core::{NotificationId, UserIdentity};

use crate::dto::{
    MarkAllReadResponse, NotificationListQuery, NotificationPageResponse, NotificationResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_notifications_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<NotificationListQuery>,
) -> ApiResult<Json<NotificationPageResponse>> {
    let page = state
        .notification_service
        .list_for_user(&user, query.limit(), query.offset())
        .await?;

    Ok(Json(NotificationPageResponse::from(page)))
}

pub async fn mark_notification_read_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(notification_id): Path<NotificationId>,
) -> ApiResult<Json<NotificationResponse>> {
    let notification = state
        .notification_service
        .mark_read_for_user(&user, notification_id)
        .await?;

    Ok(Json(NotificationResponse::from(notification)))
}

pub async fn mark_all_notifications_read_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<MarkAllReadResponse>> {
    let updated = state.notification_service.mark_all_read(&user).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
