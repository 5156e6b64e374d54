use super::*;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<RoleListResponse>> {
    let page = query.page_request();
    let roles = state.role_service.list_roles(page).await?;

    Ok(Json(RoleListResponse::new(page, roles)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<DataResponse<RoleResponse>>)> {
    let role = state.role_service.create_role(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(RoleResponse::from(role))),
    ))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<DataResponse<RoleResponse>>> {
    let role = state.role_service.get_role(parse_role_id(&role_id)?).await?;

    Ok(Json(DataResponse::new(RoleResponse::from(role))))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<DataResponse<RoleResponse>>> {
    let role = state
        .role_service
        .update_role(parse_role_id(&role_id)?, payload.into())
        .await?;

    Ok(Json(DataResponse::new(RoleResponse::from(role))))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .role_service
        .delete_role(parse_role_id(&role_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
