//! HTTP route handlers for the FoodieEats API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Liveness check
//! GET    /health/ready                 - Readiness check (pings MongoDB)
//!
//! # Users
//! POST   /users/signup                 - Create account -> { user, token }
//! POST   /users/login                  - Login -> { user, token }
//! GET    /users/{id}                   - Fetch a user (never the hash)
//! PUT    /users/{id}                   - Update name/profile/privacy (self only)
//! DELETE /users/{id}                   - Delete account (self only)
//! POST   /users/{id}/followers         - Follow toggle
//! DELETE /users/{id}/followers         - Follow toggle (same semantics)
//!
//! # Posts
//! POST   /posts                        - Create a review post
//! GET    /posts/{id}                   - Fetch a post
//! DELETE /posts/{id}                   - Delete a post + its comments (author only)
//! GET    /posts/user/{id}              - A user's posts, newest first
//! GET    /posts/{id}/following         - Feed from users {id} follows, newest first
//! POST   /posts/{id}/like              - Like toggle
//! GET    /posts/{id}/comments          - List comments, oldest first
//! POST   /posts/{id}/comments          - Create a comment
//! DELETE /posts/{id}/comments/{comment_id} - Delete a comment (author only)
//!
//! # Comments
//! POST   /comments/{id}/like           - Like toggle
//!
//! # Restaurants
//! GET    /restaurants                  - List restaurants
//! GET    /restaurants/{id}             - Fetch a restaurant
//! PUT    /restaurants/{id}             - Update info (owning owner only)
//! GET    /restaurants/{id}/menu        - List the menu
//! POST   /restaurants/{id}/menu        - Add a dish (owning owner only)
//! PUT    /restaurants/{id}/menu/{dish_id}        - Update a dish (owning owner only)
//! DELETE /restaurants/{id}/menu/{dish_id}        - Remove a dish (owning owner only)
//! PUT    /restaurants/{id}/menu/{dish_id}/rating - Rate a dish (any user)
//!
//! # Owners
//! POST   /owners/signup                - Owner + restaurant signup -> { owner, restaurant, token }
//! POST   /owners/login                 - Login -> { owner, token }
//!
//! # Misc
//! POST   /auth/logout                  - Revoke the bearer token
//! POST   /speech-to-text               - Multipart audio -> { text }
//! ```

pub mod comments;
pub mod owners;
pub mod posts;
pub mod restaurants;
pub mod speech;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::error::AppError;
use crate::state::AppState;

/// Map a malformed path id to a 400.
pub(crate) fn invalid_id(err: foodie_eats_core::IdError) -> AppError {
    AppError::Validation(err.to_string())
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::remove),
        )
        .route(
            "/{id}/followers",
            post(users::toggle_followers).delete(users::toggle_followers),
        )
}

/// Create the post routes router (comments on a post live here too).
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(posts::create))
        .route("/user/{id}", get(posts::by_user))
        .route("/{id}", get(posts::show).delete(posts::remove))
        .route("/{id}/following", get(posts::feed))
        .route("/{id}/like", post(posts::toggle_like))
        .route(
            "/{id}/comments",
            get(comments::list).post(comments::create),
        )
        .route("/{id}/comments/{comment_id}", delete(comments::remove))
}

/// Create the comment routes router.
pub fn comment_routes() -> Router<AppState> {
    Router::new().route("/{id}/like", post(comments::toggle_like))
}

/// Create the restaurant routes router.
pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(restaurants::list))
        .route(
            "/{id}",
            get(restaurants::show).put(restaurants::update),
        )
        .route(
            "/{id}/menu",
            get(restaurants::menu).post(restaurants::add_menu_item),
        )
        .route(
            "/{id}/menu/{dish_id}",
            put(restaurants::update_menu_item).delete(restaurants::remove_menu_item),
        )
        .route("/{id}/menu/{dish_id}/rating", put(restaurants::rate))
}

/// Create the owner routes router.
pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(owners::signup))
        .route("/login", post(owners::login))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/posts", post_routes())
        .nest("/comments", comment_routes())
        .nest("/restaurants", restaurant_routes())
        .nest("/owners", owner_routes())
        .route("/auth/logout", post(users::logout))
        .route("/speech-to-text", post(speech::transcribe))
}
