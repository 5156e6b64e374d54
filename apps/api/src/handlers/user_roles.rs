use super::*;

pub async fn list_user_roles_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<DataResponse<Vec<UserRoleResponse>>>> {
    let roles = state
        .user_role_service
        .list_roles_for_user(parse_user_id(&user_id)?)
        .await?
        .into_iter()
        .map(UserRoleResponse::from)
        .collect();

    Ok(Json(DataResponse::new(roles)))
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<AssignRoleRequest>,
) -> ApiResult<(StatusCode, Json<DataResponse<RoleAssignmentResponse>>)> {
    let target_user_id = parse_user_id(&user_id)?;
    let role_id = parse_role_id(&payload.role_id)?;

    let outcome = state
        .user_role_service
        .assign_role(actor.user_id(), target_user_id, role_id)
        .await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(DataResponse::new(RoleAssignmentResponse::from(outcome))),
    ))
}

pub async fn unassign_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<UserIdentity>,
    Path((user_id, role_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let target_user_id = parse_user_id(&user_id)?;
    let role_id = parse_role_id(&role_id)?;

    state
        .user_role_service
        .unassign_role(actor.user_id(), target_user_id, role_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
