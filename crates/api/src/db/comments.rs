//! Repository for post comments.

use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use foodie_eats_core::{CommentId, PostId, UserId};

use crate::db::RepositoryError;
use crate::models::Comment;
use crate::services::engagement::{COMMENT_LIKES, Toggle, toggle_membership};

pub const COLLECTION: &str = "comments";

/// Repository for the `comments` collection.
#[derive(Clone)]
pub struct CommentRepository {
    collection: Collection<Comment>,
}

impl CommentRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Insert a new comment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn create(&self, comment: &Comment) -> Result<(), RepositoryError> {
        self.collection.insert_one(comment).await?;
        Ok(())
    }

    /// Fetch a comment by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn get(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Delete a comment. Returns `true` if a document was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn delete(&self, id: CommentId) -> Result<bool, RepositoryError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count == 1)
    }

    /// All comments on a post, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn list_by_post(&self, post: PostId) -> Result<Vec<Comment>, RepositoryError> {
        let cursor = self
            .collection
            .find(doc! { "post_id": post })
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Delete every comment on a post (post-delete cascade). Returns the
    /// number of comments removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn delete_by_post(&self, post: PostId) -> Result<u64, RepositoryError> {
        let result = self.collection.delete_many(doc! { "post_id": post }).await?;
        Ok(result.deleted_count)
    }

    /// Toggle `user`'s like on a comment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the comment does not exist.
    pub async fn toggle_like(
        &self,
        comment: CommentId,
        user: UserId,
    ) -> Result<Toggle, RepositoryError> {
        toggle_membership(&self.collection, COMMENT_LIKES, comment, user).await
    }
}
