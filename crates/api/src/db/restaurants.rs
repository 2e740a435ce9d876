//! Repository for restaurants and their embedded menus.

use futures::TryStreamExt;
use mongodb::bson::{Document, doc, to_bson};
use mongodb::{Collection, Database};

use foodie_eats_core::{DishId, RestaurantId};

use crate::db::RepositoryError;
use crate::models::{MenuItem, Restaurant};

pub const COLLECTION: &str = "restaurants";

/// Repository for the `restaurants` collection.
///
/// Menu items live embedded in the restaurant document, so dish operations
/// are positional updates against `menu.$` rather than a second collection.
#[derive(Clone)]
pub struct RestaurantRepository {
    collection: Collection<Restaurant>,
}

impl RestaurantRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Insert a new restaurant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn create(&self, restaurant: &Restaurant) -> Result<(), RepositoryError> {
        self.collection.insert_one(restaurant).await?;
        Ok(())
    }

    /// Fetch a restaurant by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn get(&self, id: RestaurantId) -> Result<Option<Restaurant>, RepositoryError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// All restaurants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn list(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Delete a restaurant. Returns `true` if a document was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure.
    pub async fn delete(&self, id: RestaurantId) -> Result<bool, RepositoryError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count == 1)
    }

    /// Apply a `$set` of top-level fields (name, hours, contact, ...).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no restaurant matched.
    pub async fn apply_update(
        &self,
        id: RestaurantId,
        fields: Document,
    ) -> Result<(), RepositoryError> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Append a menu item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the restaurant does not exist,
    /// or `DataCorruption` if the item fails to serialize.
    pub async fn add_menu_item(
        &self,
        id: RestaurantId,
        item: &MenuItem,
    ) -> Result<(), RepositoryError> {
        let item = to_bson(item).map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$push": { "menu": item } })
            .await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Set fields on one embedded menu item via the positional operator.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the restaurant or dish does
    /// not exist.
    pub async fn update_menu_item(
        &self,
        id: RestaurantId,
        dish: DishId,
        fields: Document,
    ) -> Result<(), RepositoryError> {
        let mut positional = Document::new();
        for (key, value) in fields {
            positional.insert(format!("menu.$.{key}"), value);
        }
        let result = self
            .collection
            .update_one(
                doc! { "_id": id, "menu._id": dish },
                doc! { "$set": positional },
            )
            .await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove one menu item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the restaurant does not exist
    /// or holds no such dish.
    pub async fn remove_menu_item(
        &self,
        id: RestaurantId,
        dish: DishId,
    ) -> Result<(), RepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! { "$pull": { "menu": { "_id": dish } } },
            )
            .await?;
        if result.modified_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Replace the whole menu and restaurant average in one write, guarded
    /// by the dish's rating count at the time it was read.
    ///
    /// Used after a rating lands: the per-dish aggregate and the restaurant
    /// aggregate must move together. The filter matches only while the dish
    /// still holds `expected_ratings` ratings, so a concurrent rating that
    /// landed in between makes this a no-op instead of overwriting it.
    /// Returns `true` if the write applied; on `false` the caller re-reads
    /// and retries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on driver failure, or
    /// `DataCorruption` if the menu fails to serialize.
    pub async fn write_menu_ratings(
        &self,
        id: RestaurantId,
        dish: DishId,
        expected_ratings: i64,
        menu: &[MenuItem],
        average_rating: f64,
    ) -> Result<bool, RepositoryError> {
        let menu = to_bson(menu).map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let result = self
            .collection
            .update_one(
                rating_write_filter(id, dish, expected_ratings),
                doc! { "$set": { "menu": menu, "average_rating": average_rating } },
            )
            .await?;
        Ok(result.matched_count == 1)
    }
}

/// Filter for the guarded rating write: the restaurant must still hold the
/// dish with the rating count the caller read.
fn rating_write_filter(id: RestaurantId, dish: DishId, expected_ratings: i64) -> Document {
    doc! {
        "_id": id,
        "menu": { "$elemMatch": { "_id": dish, "num_ratings": expected_ratings } },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn rating_write_filter_pins_the_read_count() {
        let id = RestaurantId::generate();
        let dish = DishId::generate();
        let filter = rating_write_filter(id, dish, 2);

        assert_eq!(filter.get("_id"), Some(&Bson::from(id)));
        let elem = filter
            .get_document("menu")
            .unwrap()
            .get_document("$elemMatch")
            .unwrap();
        assert_eq!(elem.get("_id"), Some(&Bson::from(dish)));
        // A concurrent rating bumps num_ratings and the stale write no longer matches
        assert_eq!(elem.get_i64("num_ratings").unwrap(), 2);
    }
}
