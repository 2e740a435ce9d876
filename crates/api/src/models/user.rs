//! User documents and response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodie_eats_core::{Email, PostId, UserId, Username};

/// Profile block embedded in the user document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Avatar image reference (object-storage URL).
    pub avatar_url: Option<String>,
    /// Free-form bio text.
    #[serde(default)]
    pub bio: String,
}

/// Privacy toggles.
///
/// Stored and settable, but not read by any handler; reserved for future
/// enforcement.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PrivacySettings {
    #[serde(default)]
    pub private_account: bool,
    #[serde(default)]
    pub hide_likes: bool,
}

/// A user document as stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub username: Username,
    pub email: Email,
    /// Argon2id hash; never serialized to clients.
    pub password_hash: String,
    #[serde(default)]
    pub profile: Profile,
    /// Users following this user. Kept in lockstep with the other side's
    /// `following` list by the follow toggle.
    #[serde(default)]
    pub followers: Vec<UserId>,
    /// Users this user follows.
    #[serde(default)]
    pub following: Vec<UserId>,
    /// Posts this user has liked (mirror of the posts' `like_list`s).
    #[serde(default)]
    pub likes: Vec<PostId>,
    #[serde(default)]
    pub privacy: PrivacySettings,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Client-facing user shape.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub profile: Profile,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub likes: Vec<String>,
    pub privacy: PrivacySettings,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name,
            username: user.username.into_inner(),
            email: user.email.into_inner(),
            profile: user.profile,
            followers: user.followers.iter().map(UserId::to_hex).collect(),
            following: user.following.iter().map(UserId::to_hex).collect(),
            likes: user.likes.iter().map(PostId::to_hex).collect(),
            privacy: user.privacy,
            created_at: user.created_at,
        }
    }
}
