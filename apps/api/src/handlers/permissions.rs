use rolegate_domain::Permission;

use super::*;

pub async fn list_permissions_handler() -> Json<DataResponse<Vec<PermissionResponse>>> {
    let permissions = Permission::descriptors()
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Json(DataResponse::new(permissions))
}
