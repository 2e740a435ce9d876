//! Comment documents and response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodie_eats_core::{CommentId, PostId, UserId};

/// A comment as stored in the `comments` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub text: String,
    #[serde(default)]
    pub like_list: Vec<UserId>,
    #[serde(default)]
    pub num_likes: i64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Client-facing comment shape.
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub text: String,
    pub like_list: Vec<String>,
    pub num_likes: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_hex(),
            post_id: comment.post_id.to_hex(),
            user_id: comment.user_id.to_hex(),
            text: comment.text,
            like_list: comment.like_list.iter().map(UserId::to_hex).collect(),
            num_likes: comment.num_likes,
            created_at: comment.created_at,
        }
    }
}
