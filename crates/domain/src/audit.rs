use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rolegate_core::AppError;
use serde::{Deserialize, Serialize};

/// Role assignment change recorded in the append-only audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleAuditAction {
    /// A role was granted to a user.
    Assign,
    /// A role was revoked from a user.
    Remove,
}

impl RoleAuditAction {
    /// Returns the stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Remove => "remove",
        }
    }
}

impl Display for RoleAuditAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for RoleAuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "assign" => Ok(Self::Assign),
            "remove" => Ok(Self::Remove),
            _ => Err(AppError::Validation(
                "action must be assign or remove".to_owned(),
            )),
        }
    }
}
