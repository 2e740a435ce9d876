//! Post route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use foodie_eats_core::{DishId, PostId, Rating, RestaurantId, UserId};

use crate::db::{CommentRepository, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Post, PostResponse, Role};
use crate::routes::invalid_id;
use crate::services::{Toggle, verify_ownership};
use crate::state::AppState;

/// Create-post request body.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub restaurant_id: String,
    pub dish_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Star rating, 1-5.
    pub rating: u8,
    pub image_url: Option<String>,
}

/// Like toggle response.
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    /// Whether the actor likes the target after the toggle.
    pub liked: bool,
    pub num_likes: i64,
}

/// `POST /posts`
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse> {
    if actor.role != Role::User {
        return Err(AppError::Forbidden(
            "only user accounts can post reviews".to_string(),
        ));
    }
    let restaurant_id = RestaurantId::parse(&req.restaurant_id).map_err(invalid_id)?;
    let dish_id = DishId::parse(&req.dish_id).map_err(invalid_id)?;
    let rating =
        Rating::new(req.rating).map_err(|e| AppError::Validation(e.to_string()))?;
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }

    let post = Post {
        id: PostId::generate(),
        user_id: UserId::new(actor.subject_id),
        restaurant_id,
        dish_id,
        title: req.title,
        description: req.description,
        rating,
        image_url: req.image_url,
        like_list: vec![],
        num_likes: 0,
        comments_list: vec![],
        num_comments: 0,
        created_at: Utc::now(),
    };
    PostRepository::new(state.db()).create(&post).await?;
    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// `GET /posts/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>> {
    let id = PostId::parse(&id).map_err(invalid_id)?;
    let post = PostRepository::new(state.db())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;
    Ok(Json(post.into()))
}

/// `DELETE /posts/{id}` (author only)
///
/// Deleting a post also deletes every comment on it; comments must not
/// outlive the post they hang off.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = PostId::parse(&id).map_err(invalid_id)?;
    let posts = PostRepository::new(state.db());
    let post = posts
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;
    verify_ownership(&actor, &post)?;

    posts.delete(id).await?;
    let removed = CommentRepository::new(state.db())
        .delete_by_post(id)
        .await?;
    tracing::debug!(post_id = %id, comments_removed = removed, "Deleted post");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /posts/user/{id}` - one user's posts, newest first.
pub async fn by_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PostResponse>>> {
    let user = UserId::parse(&id).map_err(invalid_id)?;
    let posts = PostRepository::new(state.db()).list_by_user(user).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// `GET /posts/{id}/following` - feed of posts by users `{id}` follows.
pub async fn feed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PostResponse>>> {
    let id = UserId::parse(&id).map_err(invalid_id)?;
    let user = UserRepository::new(state.db())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
    let posts = PostRepository::new(state.db())
        .feed(&user.following)
        .await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// `POST /posts/{id}/like`
///
/// The post's `like_list`/`num_likes` is the ledger; the actor's `likes`
/// list is a mirror written second.
pub async fn toggle_like(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>> {
    let post_id = PostId::parse(&id).map_err(invalid_id)?;
    if actor.role != Role::User {
        return Err(AppError::Forbidden(
            "only user accounts can like posts".to_string(),
        ));
    }
    let actor_id = UserId::new(actor.subject_id);

    let users = UserRepository::new(state.db());
    if !users.exists(actor_id).await? {
        return Err(AppError::NotFound("your account no longer exists".to_string()));
    }

    let posts = PostRepository::new(state.db());
    let outcome = posts.toggle_like(post_id, actor_id).await?;
    let liked = outcome == Toggle::Engaged;
    users.set_post_liked(actor_id, post_id, liked).await?;

    let post = posts
        .get(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;
    Ok(Json(LikeResponse {
        liked,
        num_likes: post.num_likes,
    }))
}
