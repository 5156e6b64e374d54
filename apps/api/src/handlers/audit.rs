use super::*;

pub async fn list_role_audit_handler(
    State(state): State<AppState>,
    Query(params): Query<RoleAuditQueryParams>,
) -> ApiResult<Json<RoleAuditListResponse>> {
    let query = params.into_query()?;
    let entries = state.role_audit_service.list_entries(query).await?;

    Ok(Json(RoleAuditListResponse::new(query.page, entries)))
}
