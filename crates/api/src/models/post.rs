//! Post documents and response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodie_eats_core::{CommentId, DishId, PostId, Rating, RestaurantId, UserId};

/// A dish-review post as stored in the `posts` collection.
///
/// `num_likes` and `num_comments` are denormalized counters; every mutation
/// changes them in the same atomic update as the corresponding list, so they
/// always equal the list lengths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    /// Id of a menu item embedded in the restaurant document.
    pub dish_id: DishId,
    pub title: String,
    pub description: String,
    pub rating: Rating,
    pub image_url: Option<String>,
    #[serde(default)]
    pub like_list: Vec<UserId>,
    #[serde(default)]
    pub num_likes: i64,
    #[serde(default)]
    pub comments_list: Vec<CommentId>,
    #[serde(default)]
    pub num_comments: i64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Client-facing post shape.
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub restaurant_id: String,
    pub dish_id: String,
    pub title: String,
    pub description: String,
    pub rating: u8,
    pub image_url: Option<String>,
    pub like_list: Vec<String>,
    pub num_likes: i64,
    pub comments_list: Vec<String>,
    pub num_comments: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.to_hex(),
            user_id: post.user_id.to_hex(),
            restaurant_id: post.restaurant_id.to_hex(),
            dish_id: post.dish_id.to_hex(),
            title: post.title,
            description: post.description,
            rating: post.rating.value(),
            image_url: post.image_url,
            like_list: post.like_list.iter().map(UserId::to_hex).collect(),
            num_likes: post.num_likes,
            comments_list: post.comments_list.iter().map(CommentId::to_hex).collect(),
            num_comments: post.num_comments,
            created_at: post.created_at,
        }
    }
}
