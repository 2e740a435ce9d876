//! Repository for bearer-token sessions.

use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::{Collection, Database};

use crate::db::RepositoryError;
use crate::models::Session;

pub const COLLECTION: &str = "sessions";

/// Repository for the `sessions` collection.
///
/// The token string is the `_id`. A TTL index on `expires_at` reaps stale
/// sessions in the background; lookups still check expiry themselves.
#[derive(Clone)]
pub struct SessionRepository {
    collection: Collection<Session>,
}

impl SessionRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Store a freshly issued session.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn insert(&self, session: &Session) -> Result<(), RepositoryError> {
        self.collection.insert_one(session).await?;
        Ok(())
    }

    /// Look up a session by its token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn get(&self, token: &str) -> Result<Option<Session>, RepositoryError> {
        Ok(self.collection.find_one(doc! { "_id": token }).await?)
    }

    /// Delete a session. Returns `true` if one was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn delete(&self, token: &str) -> Result<bool, RepositoryError> {
        let result = self.collection.delete_one(doc! { "_id": token }).await?;
        Ok(result.deleted_count == 1)
    }

    /// Revoke every session issued to a subject (used on account deletion).
    /// Returns the number of sessions removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn delete_for_subject(&self, subject_id: ObjectId) -> Result<u64, RepositoryError> {
        let result = self
            .collection
            .delete_many(doc! { "subject_id": subject_id })
            .await?;
        Ok(result.deleted_count)
    }
}
