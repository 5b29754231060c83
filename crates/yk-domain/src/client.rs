//! Client rows: the tenants files and accounts belong to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row of the `clients` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
}

/// Which clients a caller is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientScope {
    All,
    Only(Uuid),
}
