use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post};
use tasklane_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware, realtime};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::me_handler))
        .route(
            "/api/boards",
            get(handlers::boards::list_boards_handler)
                .post(handlers::boards::create_board_handler),
        )
        .route(
            "/api/boards/{board_id}",
            get(handlers::boards::get_board_handler)
                .patch(handlers::boards::update_board_handler)
                .delete(handlers::boards::delete_board_handler),
        )
        .route(
            "/api/boards/{board_id}/access",
            get(handlers::boards::board_access_handler),
        )
        .route(
            "/api/boards/{board_id}/members",
            get(handlers::members::list_members_handler)
                .post(handlers::members::add_members_handler)
                .delete(handlers::members::remove_members_handler),
        )
        .route(
            "/api/boards/{board_id}/members/{member_id}",
            get(handlers::members::get_member_handler),
        )
        .route(
            "/api/boards/{board_id}/members/{member_id}/roles",
            patch(handlers::members::update_member_roles_handler),
        )
        .route(
            "/api/boards/{board_id}/members/{member_id}/permissions",
            patch(handlers::members::update_member_permissions_handler),
        )
        .route(
            "/api/boards/{board_id}/lists",
            get(handlers::boards::list_lists_handler).post(handlers::boards::create_list_handler),
        )
        .route(
            "/api/boards/{board_id}/lists/{list_id}",
            patch(handlers::boards::rename_list_handler)
                .delete(handlers::boards::delete_list_handler),
        )
        .route(
            "/api/boards/{board_id}/lists/{list_id}/tasks",
            get(handlers::boards::list_tasks_handler).post(handlers::boards::create_task_handler),
        )
        .route(
            "/api/boards/{board_id}/tasks/{task_id}",
            get(handlers::boards::get_task_handler)
                .patch(handlers::boards::update_task_handler)
                .delete(handlers::boards::delete_task_handler),
        )
        .route(
            "/api/boards/{board_id}/tasks/{task_id}/assignees",
            post(handlers::boards::assign_task_handler)
                .delete(handlers::boards::unassign_task_handler),
        )
        .route(
            "/api/boards/{board_id}/tasks/{task_id}/status",
            patch(handlers::boards::update_task_status_handler),
        )
        .route(
            "/api/boards/{board_id}/tasks/{task_id}/move",
            patch(handlers::boards::move_task_handler),
        )
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications_handler),
        )
        .route(
            "/api/notifications/read-all",
            patch(handlers::notifications::mark_all_notifications_read_handler),
        )
        .route(
            "/api/notifications/{notification_id}/read",
            patch(handlers::notifications::mark_notification_read_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let cors_layer = cors::build_cors_layer(frontend_url)?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/register", post(handlers::auth::register_handler))
        .route("/auth/login", post(handlers::auth::login_handler))
        .route(
            "/hub/notifications",
            get(realtime::notifications_hub_handler),
        )
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
