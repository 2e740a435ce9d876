//! Restaurant documents, embedded menu items, and response shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodie_eats_core::{DishId, RestaurantId};

/// Geographic coordinates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A menu item embedded in the restaurant document.
///
/// `average_rating`/`num_ratings` form the per-dish rating aggregate; the
/// restaurant-level `average_rating` is a weighted mean over these pairs and
/// is recomputed in full whenever any dish rating changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: DishId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub num_ratings: i64,
}

/// A restaurant document as stored in the `restaurants` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(rename = "_id")]
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub location: String,
    /// Operating hours, display text (e.g. "Mon-Fri 11:00-22:00").
    #[serde(default)]
    pub hours: String,
    /// Contact info, display text (phone or email).
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    /// Weighted mean over all menu items; 0.0 when no dish has ratings.
    #[serde(default)]
    pub average_rating: f64,
}

/// Client-facing menu item shape.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItemResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub average_rating: f64,
    pub num_ratings: i64,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            id: item.id.to_hex(),
            name: item.name,
            description: item.description,
            price: item.price,
            average_rating: item.average_rating,
            num_ratings: item.num_ratings,
        }
    }
}

/// Client-facing restaurant shape.
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantResponse {
    pub id: String,
    pub name: String,
    pub location: String,
    pub hours: String,
    pub contact: String,
    pub coordinates: Coordinates,
    pub menu: Vec<MenuItemResponse>,
    pub average_rating: f64,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id.to_hex(),
            name: restaurant.name,
            location: restaurant.location,
            hours: restaurant.hours,
            contact: restaurant.contact,
            coordinates: restaurant.coordinates,
            menu: restaurant
                .menu
                .into_iter()
                .map(MenuItemResponse::from)
                .collect(),
            average_rating: restaurant.average_rating,
        }
    }
}
