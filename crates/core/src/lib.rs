//! Shared primitives for all Rust crates in Rolegate.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;
mod pagination;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use auth::UserIdentity;
pub use pagination::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, PageRequest};

/// Result type used across Rolegate crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Unique identifier for a user owned by the external user directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Permission key is not part of the compiled catalog.
    #[error("permission not in catalog: {0}")]
    PermissionInvalid(String),

    /// Role does not exist or is tombstoned.
    #[error("role not found: {0}")]
    RoleNotFound(String),

    /// User does not exist in the user directory.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// No active user-role assignment exists for the pair.
    #[error("user role assignment not found: {0}")]
    AssignmentNotFound(String),

    /// Another live role already holds the slug.
    #[error("role slug already exists: {0}")]
    RoleSlugConflict(String),

    /// Another live role already holds the name.
    #[error("role name already exists: {0}")]
    RoleNameConflict(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// System roles cannot be deleted or lose permissions.
    #[error("system role is protected: {0}")]
    SystemRoleProtected(String),

    /// Caller identity is missing or invalid.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is identified but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the stable machine code used at transport boundaries.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::PermissionInvalid(_) => "UNPROCESSABLE",
            Self::RoleNotFound(_) | Self::UserNotFound(_) | Self::AssignmentNotFound(_) => {
                "NOT_FOUND"
            }
            Self::RoleSlugConflict(_) | Self::RoleNameConflict(_) | Self::Conflict(_) => {
                "CONFLICT"
            }
            Self::SystemRoleProtected(_) | Self::Forbidden(_) => "FORBIDDEN",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether the error reports an infrastructure failure rather than a domain outcome.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}
