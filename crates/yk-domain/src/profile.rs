//! Profile rows: the role and tenant attached to an account.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ClientScope;
use crate::role::Role;

/// A row of the `profiles` table, keyed by the account id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub role: Role,
    /// Tenant the account belongs to. Always `None` for admins.
    #[serde(default)]
    pub client_id: Option<Uuid>,
}

/// Which profiles a caller is allowed to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileScope {
    All,
    Client(Uuid),
}

impl Profile {
    /// Clients this caller may see: all of them for admins, otherwise the
    /// caller's own. `None` for an account attached to no client.
    pub fn client_scope(&self) -> Option<ClientScope> {
        if self.role.is_admin() {
            return Some(ClientScope::All);
        }
        self.client_id.map(ClientScope::Only)
    }

    /// Listing scope for this caller, `None` when listing is not permitted.
    pub fn listing_scope(&self) -> Option<ProfileScope> {
        match (self.role, self.client_id) {
            (Role::Admin, _) => Some(ProfileScope::All),
            (Role::ClientAdmin, Some(client_id)) => Some(ProfileScope::Client(client_id)),
            _ => None,
        }
    }
}
