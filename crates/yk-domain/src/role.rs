//! Account role domain types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account permission level stored in the `profiles.role` column.
///
/// Wire format: lowercase string (`admin`, `client_admin`, `user`).
/// Older rows carry `client` for plain users; it parses as [`Role::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ClientAdmin,
    #[serde(alias = "client")]
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ClientAdmin => "client_admin",
            Self::User => "user",
        }
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
