use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account record, owned by the external auth service. Referenced here
/// for display-field joins and account deletion only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
}
