//! Owner route handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use foodie_eats_core::RestaurantId;

use crate::error::Result;
use crate::models::{Coordinates, OwnerResponse, Restaurant, RestaurantResponse};
use crate::services::AuthService;
use crate::state::AppState;

/// Owner signup request body: the account plus its restaurant.
#[derive(Debug, Deserialize)]
pub struct OwnerSignupRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub restaurant: RestaurantDraft,
}

/// Restaurant details supplied at owner signup.
#[derive(Debug, Deserialize)]
pub struct RestaurantDraft {
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub coordinates: Coordinates,
}

/// Owner login request body.
#[derive(Debug, Deserialize)]
pub struct OwnerLoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful owner signup response.
#[derive(Debug, Serialize)]
pub struct OwnerSignupResponse {
    pub owner: OwnerResponse,
    pub restaurant: RestaurantResponse,
    pub token: String,
}

/// Successful owner login response.
#[derive(Debug, Serialize)]
pub struct OwnerLoginResponse {
    pub owner: OwnerResponse,
    pub token: String,
}

/// `POST /owners/signup`
///
/// Creates the restaurant and the owner account together; if the owner
/// insert fails the restaurant is rolled back, so a failed signup leaves
/// nothing behind.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<OwnerSignupRequest>,
) -> Result<impl IntoResponse> {
    let restaurant = Restaurant {
        id: RestaurantId::generate(),
        name: req.restaurant.name,
        location: req.restaurant.location,
        hours: req.restaurant.hours,
        contact: req.restaurant.contact,
        coordinates: req.restaurant.coordinates,
        menu: vec![],
        average_rating: 0.0,
    };

    let auth = AuthService::new(state.db());
    let (owner, restaurant, token) = auth
        .register_owner(
            &req.name,
            &req.username,
            &req.email,
            &req.password,
            restaurant,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(OwnerSignupResponse {
            owner: owner.into(),
            restaurant: restaurant.into(),
            token,
        }),
    ))
}

/// `POST /owners/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<OwnerLoginRequest>,
) -> Result<Json<OwnerLoginResponse>> {
    let auth = AuthService::new(state.db());
    let (owner, token) = auth.login_owner(&req.email, &req.password).await?;
    Ok(Json(OwnerLoginResponse {
        owner: owner.into(),
        token,
    }))
}
