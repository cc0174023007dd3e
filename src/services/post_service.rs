use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Comment, Like, Post};
use crate::services::{guard, parse_id, FieldErrors, ServiceError};
use crate::store::AggregateStore;

#[derive(Debug, Default, Deserialize)]
pub struct PostInput {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentInput {
    pub text: Option<String>,
}

pub struct PostService {
    store: Arc<dyn AggregateStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn AggregateStore>) -> Self {
        Self { store }
    }

    /// Create a post, snapshotting the author's current display name and
    /// avatar into it. The snapshot is never re-synced afterwards.
    pub async fn create(&self, actor: Uuid, input: PostInput) -> Result<Post, ServiceError> {
        let mut errors = FieldErrors::new();
        let text = errors.require("text", input.text.as_deref()).map(String::from);
        errors.into_result()?;

        let author = self
            .store
            .find_user(actor)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;

        let post = Post::new(&author, text.unwrap_or_default());
        self.store.insert_post(&post).await?;
        Ok(post)
    }

    /// All posts, most recent first.
    pub async fn list(&self) -> Result<Vec<Post>, ServiceError> {
        Ok(self.store.list_posts().await?)
    }

    pub async fn get(&self, raw_post_id: &str) -> Result<Post, ServiceError> {
        let post_id = parse_id("post", raw_post_id)?;
        self.load(post_id).await
    }

    /// Delete a post. Only the author may do this; the ownership check runs
    /// after existence is confirmed.
    pub async fn delete(&self, actor: Uuid, raw_post_id: &str) -> Result<(), ServiceError> {
        let post_id = parse_id("post", raw_post_id)?;
        let post = self.load(post_id).await?;
        guard::authorize(actor, post.author)?;
        self.store.delete_post(post_id).await?;
        Ok(())
    }

    /// Like a post. A second like by the same user is rejected, not merged.
    pub async fn like(&self, actor: Uuid, raw_post_id: &str) -> Result<Vec<Like>, ServiceError> {
        let post_id = parse_id("post", raw_post_id)?;
        let mut post = self.load(post_id).await?;

        if post.likes.iter().any(|like| like.user == actor) {
            return Err(ServiceError::conflict("Post already liked"));
        }

        post.likes.insert(0, Like { user: actor });
        self.store.replace_post(&post).await?;
        Ok(post.likes)
    }

    /// Remove the caller's like. Unliking a post never liked is a conflict,
    /// not a no-op.
    pub async fn unlike(&self, actor: Uuid, raw_post_id: &str) -> Result<Vec<Like>, ServiceError> {
        let post_id = parse_id("post", raw_post_id)?;
        let mut post = self.load(post_id).await?;

        let index = post
            .likes
            .iter()
            .position(|like| like.user == actor)
            .ok_or_else(|| ServiceError::conflict("Post has not yet been liked"))?;

        post.likes.remove(index);
        self.store.replace_post(&post).await?;
        Ok(post.likes)
    }

    /// Prepend a comment with a fresh id and the commenter's display-field
    /// snapshot.
    pub async fn add_comment(
        &self,
        actor: Uuid,
        raw_post_id: &str,
        input: CommentInput,
    ) -> Result<Vec<Comment>, ServiceError> {
        let mut errors = FieldErrors::new();
        let text = errors.require("text", input.text.as_deref()).map(String::from);
        errors.into_result()?;

        let post_id = parse_id("post", raw_post_id)?;
        let mut post = self.load(post_id).await?;

        let author = self
            .store
            .find_user(actor)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;

        post.comments.insert(0, Comment::new(&author, text.unwrap_or_default()));
        self.store.replace_post(&post).await?;
        Ok(post.comments)
    }

    /// Delete a comment by id. Only the comment's author may remove it;
    /// the element is located by its stable id, never by position guessing.
    pub async fn delete_comment(
        &self,
        actor: Uuid,
        raw_post_id: &str,
        raw_comment_id: &str,
    ) -> Result<Vec<Comment>, ServiceError> {
        let post_id = parse_id("post", raw_post_id)?;
        let comment_id = parse_id("comment", raw_comment_id)?;
        let mut post = self.load(post_id).await?;

        let index = post
            .comments
            .iter()
            .position(|comment| comment.id == comment_id)
            .ok_or_else(|| ServiceError::not_found("Comment does not exist"))?;

        guard::authorize(actor, post.comments[index].author)?;

        post.comments.remove(index);
        self.store.replace_post(&post).await?;
        Ok(post.comments)
    }

    async fn load(&self, post_id: Uuid) -> Result<Post, ServiceError> {
        self.store
            .find_post(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post not found"))
    }
}
