//! Repository for restaurant-owner accounts.

use mongodb::bson::doc;
use mongodb::{Collection, Database};

use foodie_eats_core::OwnerId;

use crate::db::{RepositoryError, map_insert_error};
use crate::models::Owner;

pub const COLLECTION: &str = "owners";

/// Repository for the `owners` collection.
#[derive(Clone)]
pub struct OwnerRepository {
    collection: Collection<Owner>,
}

impl OwnerRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Insert a new owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the username, email, or
    /// restaurant is already claimed (all three carry unique indexes).
    pub async fn create(&self, owner: &Owner) -> Result<(), RepositoryError> {
        self.collection
            .insert_one(owner)
            .await
            .map_err(|err| map_insert_error(err, "username, email, or restaurant"))?;
        Ok(())
    }

    /// Fetch an owner by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn get_by_id(&self, id: OwnerId) -> Result<Option<Owner>, RepositoryError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Fetch an owner by email (login path).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Owner>, RepositoryError> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }
}
