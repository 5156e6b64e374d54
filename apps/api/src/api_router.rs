mod cors;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get};
use rolegate_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

use self::cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let cors_layer = build_cors_layer(frontend_url, app_state.identity_header.clone())?;

    let protected_routes = Router::new()
        .route(
            "/api/permissions",
            get(handlers::permissions::list_permissions_handler),
        )
        .route(
            "/api/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/api/roles/audit",
            get(handlers::audit::list_role_audit_handler),
        )
        .route(
            "/api/roles/{role_id}",
            get(handlers::roles::get_role_handler)
                .put(handlers::roles::update_role_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/users/{user_id}/roles",
            get(handlers::user_roles::list_user_roles_handler)
                .post(handlers::user_roles::assign_role_handler),
        )
        .route(
            "/api/users/{user_id}/roles/{role_id}",
            delete(handlers::user_roles::unassign_role_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_role_manager,
        ));

    Ok(Router::new()
        .route("/api/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
