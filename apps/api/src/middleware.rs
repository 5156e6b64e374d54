use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName};
use axum::middleware::Next;
use axum::response::Response;
use rolegate_core::{AppError, AppResult, UserId, UserIdentity};
use rolegate_domain::Permission;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

/// Admits callers holding `roles:manage` and exposes their identity to handlers.
pub async fn require_role_manager(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = identity_from_headers(request.headers(), &state.identity_header)?;
    let user_id = state
        .authorization_guard
        .require_permission(identity.as_ref(), Permission::RolesManage)
        .await?;

    request.extensions_mut().insert(UserIdentity::new(user_id));
    Ok(next.run(request).await)
}

/// Reads the upstream identity header. Absence is not an error here.
pub(crate) fn identity_from_headers(
    headers: &HeaderMap,
    header: &HeaderName,
) -> AppResult<Option<UserIdentity>> {
    let Some(value) = headers.get(header) else {
        return Ok(None);
    };

    let raw = value
        .to_str()
        .map_err(|_| AppError::Unauthorized(format!("{header} header is not valid text")))?;
    let user_id = Uuid::parse_str(raw.trim()).map_err(|_| {
        AppError::Unauthorized(format!("{header} header must carry a user UUID"))
    })?;

    Ok(Some(UserIdentity::new(UserId::from_uuid(user_id))))
}
