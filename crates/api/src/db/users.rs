//! Repository for user accounts and their social graph.

use mongodb::bson::{Document, doc};
use mongodb::{Collection, Database};

use foodie_eats_core::{PostId, UserId};

use crate::db::{RepositoryError, map_insert_error};
use crate::models::User;
use crate::services::engagement::{FOLLOWERS, Toggle, toggle_membership};

pub const COLLECTION: &str = "users";

/// Repository for the `users` collection.
#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the username or email is
    /// already taken.
    pub async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        self.collection
            .insert_one(user)
            .await
            .map_err(|err| map_insert_error(err, "username or email"))?;
        Ok(())
    }

    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Fetch a user by email (login path).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    /// Whether a user with this id exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn exists(&self, id: UserId) -> Result<bool, RepositoryError> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id })
            .await?
            .is_some())
    }

    /// Apply a `$set` of top-level fields to a user document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user matched.
    pub async fn apply_update(&self, id: UserId, fields: Document) -> Result<(), RepositoryError> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a user. Returns `true` if a document was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count == 1)
    }

    /// Toggle `follower`'s membership in `target`'s follower list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the target user does not exist.
    pub async fn toggle_follower(
        &self,
        target: UserId,
        follower: UserId,
    ) -> Result<Toggle, RepositoryError> {
        toggle_membership(&self.collection, FOLLOWERS, target, follower).await
    }

    /// Mirror a follow toggle onto the actor's own `following` list.
    ///
    /// Idempotent: `$addToSet`/`$pull` leave the list unchanged if the
    /// mirror is already in the requested state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the actor does not exist.
    pub async fn set_following(
        &self,
        actor: UserId,
        target: UserId,
        engaged: bool,
    ) -> Result<(), RepositoryError> {
        let update = if engaged {
            doc! { "$addToSet": { "following": target } }
        } else {
            doc! { "$pull": { "following": target } }
        };
        let result = self
            .collection
            .update_one(doc! { "_id": actor }, update)
            .await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Mirror a post-like toggle onto the actor's `likes` list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the actor does not exist.
    pub async fn set_post_liked(
        &self,
        actor: UserId,
        post: PostId,
        liked: bool,
    ) -> Result<(), RepositoryError> {
        let update = if liked {
            doc! { "$addToSet": { "likes": post } }
        } else {
            doc! { "$pull": { "likes": post } }
        };
        let result = self
            .collection
            .update_one(doc! { "_id": actor }, update)
            .await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
