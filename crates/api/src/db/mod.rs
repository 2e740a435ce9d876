//! Database operations for the FoodieEats MongoDB store.
//!
//! # Database: `foodie_eats`
//!
//! ## Collections
//!
//! - `users` - Accounts, profiles, and the social graph (followers/following/likes)
//! - `posts` - Dish reviews with denormalized like/comment counters
//! - `comments` - Post comments with their own like ledgers
//! - `restaurants` - Restaurant info plus the embedded menu and rating aggregates
//! - `owners` - Restaurant-owner accounts (one restaurant per owner)
//! - `sessions` - Bearer tokens with a 1-hour expiry
//!
//! # Indexes
//!
//! Unique indexes are created at startup by [`ensure_indexes`]:
//! `users.username`, `users.email`, `owners.username`, `owners.email`, and
//! `owners.restaurant_id` (one owner per restaurant is a store constraint,
//! not a code-path convention). `sessions.expires_at` carries a TTL index so
//! the store reaps expired tokens on its own.

pub mod comments;
pub mod owners;
pub mod posts;
pub mod restaurants;
pub mod sessions;
pub mod users;

use std::time::Duration;

use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};
use secrecy::ExposeSecret;
use thiserror::Error;

pub use comments::CommentRepository;
pub use owners::OwnerRepository;
pub use posts::PostRepository;
pub use restaurants::RestaurantRepository;
pub use sessions::SessionRepository;
pub use users::UserRepository;

/// MongoDB duplicate-key error code.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from the MongoDB driver.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested document was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username or email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Connect to MongoDB and select the application database.
///
/// # Arguments
///
/// * `database_url` - MongoDB connection string (wrapped in `SecretString`)
/// * `database_name` - Name of the database to use
///
/// # Errors
///
/// Returns `mongodb::error::Error` if the connection string is invalid.
pub async fn connect(
    database_url: &secrecy::SecretString,
    database_name: &str,
) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(database_url.expose_secret()).await?;
    Ok(client.database(database_name))
}

/// Create the unique and TTL indexes the application relies on.
///
/// Safe to call on every startup; index creation is idempotent.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if index creation fails.
pub async fn ensure_indexes(db: &Database) -> Result<(), RepositoryError> {
    let unique = |keys| {
        IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build()
    };

    let users = db.collection::<mongodb::bson::Document>(users::COLLECTION);
    users.create_index(unique(doc! { "username": 1 })).await?;
    users.create_index(unique(doc! { "email": 1 })).await?;

    let owners = db.collection::<mongodb::bson::Document>(owners::COLLECTION);
    owners.create_index(unique(doc! { "username": 1 })).await?;
    owners.create_index(unique(doc! { "email": 1 })).await?;
    owners
        .create_index(unique(doc! { "restaurant_id": 1 }))
        .await?;

    // Comments are always fetched by post
    let comments = db.collection::<mongodb::bson::Document>(comments::COLLECTION);
    comments
        .create_index(IndexModel::builder().keys(doc! { "post_id": 1 }).build())
        .await?;

    // Expired sessions are reaped by the store; verify_token still checks
    // expiry explicitly because TTL deletion is lazy
    let sessions = db.collection::<mongodb::bson::Document>(sessions::COLLECTION);
    sessions
        .create_index(
            IndexModel::builder()
                .keys(doc! { "expires_at": 1 })
                .options(
                    IndexOptions::builder()
                        .expire_after(Duration::from_secs(0))
                        .build(),
                )
                .build(),
        )
        .await?;

    Ok(())
}

/// Whether a driver error is a unique-index (duplicate key) violation.
#[must_use]
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(write_err)) => {
            write_err.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}

/// Map a driver error to `Conflict` when it is a duplicate-key violation.
pub(crate) fn map_insert_error(err: mongodb::error::Error, what: &str) -> RepositoryError {
    if is_duplicate_key(&err) {
        RepositoryError::Conflict(format!("{what} already exists"))
    } else {
        RepositoryError::Database(err)
    }
}
