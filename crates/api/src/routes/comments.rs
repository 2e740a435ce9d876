//! Comment route handlers.
//!
//! Comment creation and deletion keep the parent post's `comments_list` and
//! `num_comments` ledger in step: the comment document is written first,
//! then the post ledger moves by exactly one in a single conditional update.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;

use foodie_eats_core::{CommentId, PostId, UserId};

use crate::db::{CommentRepository, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Comment, CommentResponse, Role};
use crate::routes::invalid_id;
use crate::routes::posts::LikeResponse;
use crate::services::{Toggle, verify_ownership};
use crate::state::AppState;

/// Create-comment request body.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// `GET /posts/{id}/comments` - oldest first.
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CommentResponse>>> {
    let post_id = PostId::parse(&id).map_err(invalid_id)?;
    let posts = PostRepository::new(state.db());
    if posts.get(post_id).await?.is_none() {
        return Err(AppError::NotFound(format!("post {post_id}")));
    }
    let comments = CommentRepository::new(state.db())
        .list_by_post(post_id)
        .await?;
    Ok(Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

/// `POST /posts/{id}/comments`
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse> {
    let post_id = PostId::parse(&id).map_err(invalid_id)?;
    if actor.role != Role::User {
        return Err(AppError::Forbidden(
            "only user accounts can comment".to_string(),
        ));
    }
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }

    let posts = PostRepository::new(state.db());
    if posts.get(post_id).await?.is_none() {
        return Err(AppError::NotFound(format!("post {post_id}")));
    }

    let comment = Comment {
        id: CommentId::generate(),
        post_id,
        user_id: UserId::new(actor.subject_id),
        text: req.text,
        like_list: vec![],
        num_likes: 0,
        created_at: Utc::now(),
    };
    CommentRepository::new(state.db()).create(&comment).await?;
    posts.attach_comment(post_id, comment.id).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

/// `DELETE /posts/{id}/comments/{comment_id}` (author only)
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let post_id = PostId::parse(&id).map_err(invalid_id)?;
    let comment_id = CommentId::parse(&comment_id).map_err(invalid_id)?;

    let comments = CommentRepository::new(state.db());
    let comment = comments
        .get(comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))?;
    if comment.post_id != post_id {
        return Err(AppError::Validation(
            "comment does not belong to this post".to_string(),
        ));
    }
    verify_ownership(&actor, &comment)?;

    comments.delete(comment_id).await?;
    PostRepository::new(state.db())
        .detach_comment(post_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /comments/{id}/like`
///
/// Comment likes have no user-side mirror; the comment ledger alone is
/// authoritative.
pub async fn toggle_like(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>> {
    let comment_id = CommentId::parse(&id).map_err(invalid_id)?;
    if actor.role != Role::User {
        return Err(AppError::Forbidden(
            "only user accounts can like comments".to_string(),
        ));
    }
    let actor_id = UserId::new(actor.subject_id);

    let users = UserRepository::new(state.db());
    if !users.exists(actor_id).await? {
        return Err(AppError::NotFound("your account no longer exists".to_string()));
    }

    let comments = CommentRepository::new(state.db());
    let outcome = comments.toggle_like(comment_id, actor_id).await?;
    let comment = comments
        .get(comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))?;
    Ok(Json(LikeResponse {
        liked: outcome == Toggle::Engaged,
        num_likes: comment.num_likes,
    }))
}
