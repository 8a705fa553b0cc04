use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use tasklane_core::UserIdentity;

use crate::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let session = state.user_service.register(payload.into()).await?;
    tracing::info!(user_id = %session.user.id, "account registered");

    Ok((StatusCode::CREATED, Json(AuthResponse::from(session))))
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let session = state
        .user_service
        .login(payload.identifier.as_str(), payload.password.as_str())
        .await?;

    Ok(Json(AuthResponse::from(session)))
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<UserResponse>> {
    let record = state.user_service.current_user(&user).await?;
    Ok(Json(UserResponse::from(record)))
}
