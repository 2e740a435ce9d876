//! Repository for dish-review posts.

use futures::TryStreamExt;
use mongodb::bson::{Bson, doc};
use mongodb::{Collection, Database};

use foodie_eats_core::{CommentId, PostId, UserId};

use crate::db::RepositoryError;
use crate::models::Post;
use crate::services::engagement::{POST_COMMENTS, POST_LIKES, Toggle, toggle_membership};

pub const COLLECTION: &str = "posts";

/// Repository for the `posts` collection.
#[derive(Clone)]
pub struct PostRepository {
    collection: Collection<Post>,
}

impl PostRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Insert a new post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn create(&self, post: &Post) -> Result<(), RepositoryError> {
        self.collection.insert_one(post).await?;
        Ok(())
    }

    /// Fetch a post by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn get(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Delete a post. Returns `true` if a document was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn delete(&self, id: PostId) -> Result<bool, RepositoryError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count == 1)
    }

    /// All posts by one user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn list_by_user(&self, user: UserId) -> Result<Vec<Post>, RepositoryError> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Posts by any of the given authors, newest first (the follow feed).
    ///
    /// An empty author list yields an empty feed without touching the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn feed(&self, authors: &[UserId]) -> Result<Vec<Post>, RepositoryError> {
        if authors.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<Bson> = authors.iter().map(|id| Bson::from(*id)).collect();
        let cursor = self
            .collection
            .find(doc! { "user_id": { "$in": ids } })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Toggle `user`'s like on a post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post does not exist.
    pub async fn toggle_like(&self, post: PostId, user: UserId) -> Result<Toggle, RepositoryError> {
        toggle_membership(&self.collection, POST_LIKES, post, user).await
    }

    /// Record a new comment on the post's ledger (`comments_list` plus
    /// `num_comments`, one atomic update).
    ///
    /// Idempotent: attaching an already-attached comment is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post does not exist.
    pub async fn attach_comment(
        &self,
        post: PostId,
        comment: CommentId,
    ) -> Result<(), RepositoryError> {
        let result = self
            .collection
            .update_one(
                POST_COMMENTS.insert_filter(post, comment),
                POST_COMMENTS.insert_update(comment),
            )
            .await?;
        if result.matched_count == 0 {
            // Either the post is gone or the comment is already attached
            if self.get(post).await?.is_none() {
                return Err(RepositoryError::NotFound);
            }
        }
        Ok(())
    }

    /// Remove a comment from the post's ledger.
    ///
    /// A ledger that no longer holds the comment (or a post that is already
    /// deleted) is not an error; the end state is the same.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn detach_comment(
        &self,
        post: PostId,
        comment: CommentId,
    ) -> Result<(), RepositoryError> {
        self.collection
            .update_one(
                POST_COMMENTS.remove_filter(post, comment),
                POST_COMMENTS.remove_update(comment),
            )
            .await?;
        Ok(())
    }
}
