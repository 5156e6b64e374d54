use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rolegate_core::AppError;
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PermissionInvalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RoleNotFound(_)
            | AppError::UserNotFound(_)
            | AppError::AssignmentNotFound(_) => StatusCode::NOT_FOUND,
            AppError::RoleSlugConflict(_)
            | AppError::RoleNameConflict(_)
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::SystemRoleProtected(_) | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage details stay in the logs.
        let message = if self.0.is_internal() {
            error!(error = %self.0, "request failed");
            "internal server error".to_owned()
        } else {
            self.0.to_string()
        };

        let payload = Json(ErrorResponse {
            error: message,
            code: self.0.code().to_owned(),
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use rolegate_core::AppError;

    use super::ApiError;

    fn status_of(error: AppError) -> StatusCode {
        ApiError(error).into_response().status()
    }

    #[test]
    fn each_error_kind_maps_to_one_status() {
        let cases = [
            (AppError::Validation("v".to_owned()), StatusCode::BAD_REQUEST),
            (
                AppError::PermissionInvalid("p".to_owned()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::RoleNotFound("r".to_owned()), StatusCode::NOT_FOUND),
            (AppError::UserNotFound("u".to_owned()), StatusCode::NOT_FOUND),
            (
                AppError::AssignmentNotFound("a".to_owned()),
                StatusCode::NOT_FOUND,
            ),
            (AppError::RoleSlugConflict("s".to_owned()), StatusCode::CONFLICT),
            (AppError::RoleNameConflict("n".to_owned()), StatusCode::CONFLICT),
            (
                AppError::SystemRoleProtected("admin".to_owned()),
                StatusCode::FORBIDDEN,
            ),
            (AppError::Forbidden("f".to_owned()), StatusCode::FORBIDDEN),
            (AppError::Unauthorized("u".to_owned()), StatusCode::UNAUTHORIZED),
            (
                AppError::Internal("db".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(status_of(error), expected);
        }
    }

    #[tokio::test]
    async fn body_carries_message_and_code() {
        let response = ApiError(AppError::RoleSlugConflict("editor".to_owned())).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|_| unreachable!());
        let body: serde_json::Value =
            serde_json::from_slice(&bytes).unwrap_or_else(|_| unreachable!());

        assert_eq!(body["code"], "CONFLICT");
        assert_eq!(body["error"], "role slug already exists: editor");
    }

    #[tokio::test]
    async fn internal_details_are_not_exposed() {
        let response =
            ApiError(AppError::Internal("failed to list roles: timeout".to_owned())).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|_| unreachable!());
        let body: serde_json::Value =
            serde_json::from_slice(&bytes).unwrap_or_else(|_| unreachable!());

        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"], "internal server error");
    }
}
