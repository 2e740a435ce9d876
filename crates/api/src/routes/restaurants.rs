//! Restaurant and menu route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use mongodb::bson::{Document, to_bson};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foodie_eats_core::{DishId, OwnerId, Rating, RestaurantId};

use crate::db::{OwnerRepository, RestaurantRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{
    Actor, Coordinates, MenuItem, MenuItemResponse, RestaurantResponse, Role,
};
use crate::routes::invalid_id;
use crate::services::ratings;
use crate::state::AppState;

/// Fields an owner may change on their restaurant.
#[derive(Debug, Deserialize)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub hours: Option<String>,
    pub contact: Option<String>,
    pub coordinates: Option<Coordinates>,
}

/// New-dish request body.
#[derive(Debug, Deserialize)]
pub struct NewMenuItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
}

/// Dish update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

/// Dish rating request body.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    /// Star rating, 1-5.
    pub rating: u8,
}

/// Dish rating response: the updated dish plus the recomputed
/// restaurant-level average.
#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub dish: MenuItemResponse,
    pub restaurant_average: f64,
}

/// `GET /restaurants`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<RestaurantResponse>>> {
    let restaurants = RestaurantRepository::new(state.db()).list().await?;
    Ok(Json(
        restaurants
            .into_iter()
            .map(RestaurantResponse::from)
            .collect(),
    ))
}

/// `GET /restaurants/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantResponse>> {
    let id = RestaurantId::parse(&id).map_err(invalid_id)?;
    let restaurant = RestaurantRepository::new(state.db())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("restaurant {id}")))?;
    Ok(Json(restaurant.into()))
}

/// `PUT /restaurants/{id}` (owning owner only)
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<UpdateRestaurantRequest>,
) -> Result<Json<RestaurantResponse>> {
    let id = RestaurantId::parse(&id).map_err(invalid_id)?;
    require_restaurant_owner(&state, &actor, id).await?;

    let mut fields = Document::new();
    if let Some(name) = req.name {
        fields.insert("name", name);
    }
    if let Some(location) = req.location {
        fields.insert("location", location);
    }
    if let Some(hours) = req.hours {
        fields.insert("hours", hours);
    }
    if let Some(contact) = req.contact {
        fields.insert("contact", contact);
    }
    if let Some(coordinates) = req.coordinates {
        let coordinates =
            to_bson(&coordinates).map_err(|e| AppError::Internal(e.to_string()))?;
        fields.insert("coordinates", coordinates);
    }
    if fields.is_empty() {
        return Err(AppError::Validation("no fields to update".to_string()));
    }

    let restaurants = RestaurantRepository::new(state.db());
    restaurants.apply_update(id, fields).await?;
    let restaurant = restaurants
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("restaurant {id}")))?;
    Ok(Json(restaurant.into()))
}

/// `GET /restaurants/{id}/menu`
pub async fn menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MenuItemResponse>>> {
    let id = RestaurantId::parse(&id).map_err(invalid_id)?;
    let restaurant = RestaurantRepository::new(state.db())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("restaurant {id}")))?;
    Ok(Json(
        restaurant
            .menu
            .into_iter()
            .map(MenuItemResponse::from)
            .collect(),
    ))
}

/// `POST /restaurants/{id}/menu` (owning owner only)
pub async fn add_menu_item(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<NewMenuItemRequest>,
) -> Result<impl IntoResponse> {
    let id = RestaurantId::parse(&id).map_err(invalid_id)?;
    require_restaurant_owner(&state, &actor, id).await?;
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let item = MenuItem {
        id: DishId::generate(),
        name: req.name,
        description: req.description,
        price: req.price,
        average_rating: 0.0,
        num_ratings: 0,
    };
    RestaurantRepository::new(state.db())
        .add_menu_item(id, &item)
        .await?;
    Ok((StatusCode::CREATED, Json(MenuItemResponse::from(item))))
}

/// `PUT /restaurants/{id}/menu/{dish_id}` (owning owner only)
pub async fn update_menu_item(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path((id, dish_id)): Path<(String, String)>,
    Json(req): Json<UpdateMenuItemRequest>,
) -> Result<Json<MenuItemResponse>> {
    let id = RestaurantId::parse(&id).map_err(invalid_id)?;
    let dish_id = DishId::parse(&dish_id).map_err(invalid_id)?;
    require_restaurant_owner(&state, &actor, id).await?;

    let mut fields = Document::new();
    if let Some(name) = req.name {
        fields.insert("name", name);
    }
    if let Some(description) = req.description {
        fields.insert("description", description);
    }
    if let Some(price) = req.price {
        let price = to_bson(&price).map_err(|e| AppError::Internal(e.to_string()))?;
        fields.insert("price", price);
    }
    if fields.is_empty() {
        return Err(AppError::Validation("no fields to update".to_string()));
    }

    let restaurants = RestaurantRepository::new(state.db());
    restaurants.update_menu_item(id, dish_id, fields).await?;
    let restaurant = restaurants
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("restaurant {id}")))?;
    let item = restaurant
        .menu
        .into_iter()
        .find(|item| item.id == dish_id)
        .ok_or_else(|| AppError::NotFound(format!("dish {dish_id}")))?;
    Ok(Json(item.into()))
}

/// `DELETE /restaurants/{id}/menu/{dish_id}` (owning owner only)
pub async fn remove_menu_item(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path((id, dish_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let id = RestaurantId::parse(&id).map_err(invalid_id)?;
    let dish_id = DishId::parse(&dish_id).map_err(invalid_id)?;
    require_restaurant_owner(&state, &actor, id).await?;

    RestaurantRepository::new(state.db())
        .remove_menu_item(id, dish_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// How many times a rating write retries after losing to a concurrent rater.
const MAX_RATING_ATTEMPTS: u32 = 5;

/// `PUT /restaurants/{id}/menu/{dish_id}/rating`
///
/// Any authenticated account may rate. The dish aggregate folds the new
/// rating in incrementally; the restaurant average is recomputed in full
/// and both land in one write. The write is guarded by the rating count
/// read beforehand, so two concurrent raters cannot overwrite each other:
/// the loser re-reads and folds its rating into the fresh state.
pub async fn rate(
    State(state): State<AppState>,
    RequireAuth(_actor): RequireAuth,
    Path((id, dish_id)): Path<(String, String)>,
    Json(req): Json<RateRequest>,
) -> Result<Json<RateResponse>> {
    let id = RestaurantId::parse(&id).map_err(invalid_id)?;
    let dish_id = DishId::parse(&dish_id).map_err(invalid_id)?;
    let rating = Rating::new(req.rating).map_err(|e| AppError::Validation(e.to_string()))?;

    let restaurants = RestaurantRepository::new(state.db());
    for _ in 0..MAX_RATING_ATTEMPTS {
        let mut restaurant = restaurants
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("restaurant {id}")))?;
        let dish = restaurant
            .menu
            .iter_mut()
            .find(|item| item.id == dish_id)
            .ok_or_else(|| AppError::NotFound(format!("dish {dish_id}")))?;

        let read_count = dish.num_ratings;
        let (average, count) =
            ratings::add_rating(dish.average_rating, read_count, rating.as_f64());
        dish.average_rating = average;
        dish.num_ratings = count;
        let updated = dish.clone();

        let restaurant_average = ratings::restaurant_average(&restaurant.menu);
        let wrote = restaurants
            .write_menu_ratings(id, dish_id, read_count, &restaurant.menu, restaurant_average)
            .await?;
        if wrote {
            return Ok(Json(RateResponse {
                dish: updated.into(),
                restaurant_average,
            }));
        }
        // Lost to a concurrent rating; re-read and fold into the fresh state
    }

    Err(AppError::Conflict(
        "rating could not be recorded, please retry".to_string(),
    ))
}

/// Require an owner session whose restaurant is the one in the path.
async fn require_restaurant_owner(
    state: &AppState,
    actor: &Actor,
    restaurant: RestaurantId,
) -> Result<()> {
    if actor.role != Role::Owner {
        return Err(AppError::Forbidden(
            "only the restaurant owner may do this".to_string(),
        ));
    }
    let owner = OwnerRepository::new(state.db())
        .get_by_id(OwnerId::new(actor.subject_id))
        .await?
        .ok_or_else(|| AppError::Forbidden("owner account not found".to_string()))?;
    if owner.restaurant_id != restaurant {
        return Err(AppError::Forbidden(
            "you do not own this restaurant".to_string(),
        ));
    }
    Ok(())
}
