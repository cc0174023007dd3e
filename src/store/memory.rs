use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Post, Profile, UserRecord};
use crate::store::{AggregateStore, StoreError};

/// In-memory store for tests and local development. Implements the same
/// contract as `PgStore`, including the unique constraint on profile owner
/// and newest-first post listing.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, UserRecord>,
    profiles: HashMap<Uuid, Profile>,
    posts: HashMap<Uuid, Post>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user record, standing in for the external auth service.
    pub async fn seed_user(&self, user: UserRecord) {
        self.inner.write().await.users.insert(user.id, user);
    }
}

#[async_trait]
impl AggregateStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.write().await.users.remove(&id);
        Ok(())
    }

    async fn find_profile_by_owner(&self, owner: Uuid) -> Result<Option<Profile>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.profiles.values().find(|p| p.owner == owner).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.inner.read().await.profiles.values().cloned().collect())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.profiles.values().any(|p| p.owner == profile.owner) {
            return Err(StoreError::Duplicate("profiles.owner".to_string()));
        }
        inner.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn replace_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.profiles.contains_key(&profile.id) {
            return Err(StoreError::Missing(profile.id));
        }
        inner.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn delete_profile_by_owner(&self, owner: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.profiles.retain(|_, p| p.owner != owner);
        Ok(())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        Ok(self.inner.read().await.posts.get(&id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts: Vec<Post> = self.inner.read().await.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.posts.contains_key(&post.id) {
            return Err(StoreError::Duplicate("posts.id".to_string()));
        }
        inner.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn replace_post(&self, post: &Post) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.posts.contains_key(&post.id) {
            return Err(StoreError::Missing(post.id));
        }
        inner.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.write().await.posts.remove(&id);
        Ok(())
    }
}
