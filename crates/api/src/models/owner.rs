//! Restaurant-owner documents and response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodie_eats_core::{Email, OwnerId, RestaurantId, Username};

/// A restaurant-owner account as stored in the `owners` collection.
///
/// Exactly one restaurant per owner; `restaurant_id` carries a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    #[serde(rename = "_id")]
    pub id: OwnerId,
    pub name: String,
    pub username: Username,
    pub email: Email,
    /// Argon2id hash; never serialized to clients.
    pub password_hash: String,
    pub restaurant_id: RestaurantId,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Client-facing owner shape.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerResponse {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub restaurant_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Owner> for OwnerResponse {
    fn from(owner: Owner) -> Self {
        Self {
            id: owner.id.to_hex(),
            name: owner.name,
            username: owner.username.into_inner(),
            email: owner.email.into_inner(),
            restaurant_id: owner.restaurant_id.to_hex(),
            created_at: owner.created_at,
        }
    }
}
