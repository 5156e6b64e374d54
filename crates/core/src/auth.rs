use serde::{Deserialize, Serialize};

use crate::UserId;

/// Authenticated caller identity supplied by the upstream identity provider.
///
/// The value is trusted as-is; credentials are verified before it reaches this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: UserId,
}

impl UserIdentity {
    /// Creates an identity for an authenticated user.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Returns the authenticated user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
