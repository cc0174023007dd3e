use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Comment, Like, Post};
use crate::services::post_service::{CommentInput, PostInput};
use crate::services::PostService;
use crate::AppState;

/// POST /api/posts - Create a post
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<PostInput>,
) -> ApiResult<Post> {
    let post = PostService::new(state.store)
        .create(auth.user_id, input)
        .await?;
    Ok(ApiResponse::created(post))
}

/// GET /api/posts - All posts, newest first
pub async fn list(State(state): State<AppState>, _auth: AuthUser) -> ApiResult<Vec<Post>> {
    let posts = PostService::new(state.store).list().await?;
    Ok(ApiResponse::success(posts))
}

/// GET /api/posts/:id - Post by id
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Post> {
    let post = PostService::new(state.store).get(&id).await?;
    Ok(ApiResponse::success(post))
}

/// DELETE /api/posts/:id - Delete a post (author only)
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    PostService::new(state.store).delete(auth.user_id, &id).await?;
    Ok(ApiResponse::success(json!({ "msg": "Post deleted" })))
}

/// PUT /api/posts/like/:id - Like a post
pub async fn like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Vec<Like>> {
    let likes = PostService::new(state.store).like(auth.user_id, &id).await?;
    Ok(ApiResponse::success(likes))
}

/// PUT /api/posts/unlike/:id - Remove the caller's like
pub async fn unlike(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Vec<Like>> {
    let likes = PostService::new(state.store)
        .unlike(auth.user_id, &id)
        .await?;
    Ok(ApiResponse::success(likes))
}

/// POST /api/posts/comment/:id - Comment on a post
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<CommentInput>,
) -> ApiResult<Vec<Comment>> {
    let comments = PostService::new(state.store)
        .add_comment(auth.user_id, &id, input)
        .await?;
    Ok(ApiResponse::success(comments))
}

/// DELETE /api/posts/comment/:id/:comment_id - Delete a comment (comment
/// author only)
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Vec<Comment>> {
    let comments = PostService::new(state.store)
        .delete_comment(auth.user_id, &id, &comment_id)
        .await?;
    Ok(ApiResponse::success(comments))
}
