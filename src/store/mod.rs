pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Post, Profile, UserRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error("document missing during write-back: {0}")]
    Missing(Uuid),
}

/// Persistence seam for the two aggregate families plus the externally-owned
/// user records. Every service operation is one load, one in-memory
/// mutation, one write-back; the store holds no per-request state.
///
/// Replace operations overwrite the whole document. There is no version
/// check, so concurrent read-modify-write cycles on the same aggregate are
/// last-write-wins.
#[async_trait]
pub trait AggregateStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;
    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError>;

    async fn find_profile_by_owner(&self, owner: Uuid) -> Result<Option<Profile>, StoreError>;
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;
    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError>;
    async fn replace_profile(&self, profile: &Profile) -> Result<(), StoreError>;
    async fn delete_profile_by_owner(&self, owner: Uuid) -> Result<(), StoreError>;

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, StoreError>;
    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>, StoreError>;
    async fn insert_post(&self, post: &Post) -> Result<(), StoreError>;
    async fn replace_post(&self, post: &Post) -> Result<(), StoreError>;
    async fn delete_post(&self, id: Uuid) -> Result<(), StoreError>;
}
