use uuid::Uuid;

use crate::services::ServiceError;

/// Ownership check applied before every destructive or ownership-scoped
/// mutation. Pure identity equality; fails closed on any mismatch.
pub fn authorize(actor: Uuid, owner: Uuid) -> Result<(), ServiceError> {
    if actor == owner {
        Ok(())
    } else {
        tracing::info!(%actor, %owner, "ownership check failed");
        Err(ServiceError::NotAuthorized(
            "User not authorized".to_string(),
        ))
    }
}
