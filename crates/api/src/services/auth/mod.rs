//! Account registration, login, and bearer-token sessions.
//!
//! Tokens are opaque: 32 random bytes, base64url-encoded, stored in the
//! `sessions` collection with a one-hour expiry. Verification is a lookup
//! plus an explicit expiry check (the TTL index reaps lazily), so revocation
//! is just deleting the session document.

pub mod error;

pub use error::AuthError;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use mongodb::Database;
use mongodb::bson::oid::ObjectId;
use rand::RngCore;

use foodie_eats_core::{Email, OwnerId, UserId, Username};

use crate::db::{
    OwnerRepository, RepositoryError, RestaurantRepository, SessionRepository, UserRepository,
};
use crate::models::{
    Actor, Owner, PrivacySettings, Profile, Restaurant, Role, Session, User,
};

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Length of the random token material in bytes.
const TOKEN_BYTES: usize = 32;

/// Registration, login, and token verification for users and owners.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    owners: OwnerRepository,
    restaurants: RestaurantRepository,
    sessions: SessionRepository,
}

impl AuthService {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            users: UserRepository::new(db),
            owners: OwnerRepository::new(db),
            restaurants: RestaurantRepository::new(db),
            sessions: SessionRepository::new(db),
        }
    }

    /// Register a new user account and log it in.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad email/username/password,
    /// `AuthError::AlreadyExists` on a username or email collision, or a
    /// repository error.
    pub async fn register_user(
        &self,
        name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;
        let username = Username::parse(username)?;
        validate_password(password)?;

        let user = User {
            id: UserId::generate(),
            name: name.to_string(),
            username,
            email,
            password_hash: hash_password(password)?,
            profile: Profile::default(),
            followers: vec![],
            following: vec![],
            likes: vec![],
            privacy: PrivacySettings::default(),
            created_at: Utc::now(),
        };
        self.users.create(&user).await.map_err(conflict_to_exists)?;

        let token = self.issue_token(user.id.as_object_id(), Role::User).await?;
        Ok((user, token))
    }

    /// Log a user in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password; the two cases are indistinguishable to the client.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let Some(user) = self.users.get_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        let token = self.issue_token(user.id.as_object_id(), Role::User).await?;
        Ok((user, token))
    }

    /// Register an owner account together with its restaurant.
    ///
    /// The restaurant document is created first so the owner can reference
    /// it. If the owner insert then fails (say, a duplicate email) the
    /// restaurant is deleted again so no orphan is left behind.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `AuthError::AlreadyExists` on collision,
    /// or a repository error.
    pub async fn register_owner(
        &self,
        name: &str,
        username: &str,
        email: &str,
        password: &str,
        restaurant: Restaurant,
    ) -> Result<(Owner, Restaurant, String), AuthError> {
        let email = Email::parse(email)?;
        let username = Username::parse(username)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.restaurants.create(&restaurant).await?;

        let owner = Owner {
            id: OwnerId::generate(),
            name: name.to_string(),
            username,
            email,
            password_hash,
            restaurant_id: restaurant.id,
            created_at: Utc::now(),
        };
        if let Err(err) = self.owners.create(&owner).await {
            // Compensate: the restaurant must not outlive a failed signup
            if let Err(cleanup_err) = self.restaurants.delete(restaurant.id).await {
                tracing::error!(
                    restaurant_id = %restaurant.id,
                    error = %cleanup_err,
                    "Failed to remove restaurant after owner signup failure"
                );
            }
            return Err(conflict_to_exists(err));
        }

        let token = self
            .issue_token(owner.id.as_object_id(), Role::Owner)
            .await?;
        Ok((owner, restaurant, token))
    }

    /// Log an owner in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password.
    pub async fn login_owner(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Owner, String), AuthError> {
        let Some(owner) = self.owners.get_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &owner.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        let token = self
            .issue_token(owner.id.as_object_id(), Role::Owner)
            .await?;
        Ok((owner, token))
    }

    /// Resolve a bearer token to the actor it was issued to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for an unknown token and
    /// `AuthError::ExpiredToken` for one past its expiry (the stale session
    /// is deleted on the spot).
    pub async fn verify_token(&self, token: &str) -> Result<Actor, AuthError> {
        let Some(session) = self.sessions.get(token).await? else {
            return Err(AuthError::InvalidToken);
        };
        if session.is_expired_at(Utc::now()) {
            self.sessions.delete(token).await?;
            return Err(AuthError::ExpiredToken);
        }
        Ok(session.actor())
    }

    /// Revoke a token. Returns `true` if a session was actually deleted.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the session store fails.
    pub async fn logout(&self, token: &str) -> Result<bool, AuthError> {
        Ok(self.sessions.delete(token).await?)
    }

    async fn issue_token(&self, subject_id: ObjectId, role: Role) -> Result<String, AuthError> {
        let token = generate_token();
        let session = Session::issue(token.clone(), subject_id, role);
        self.sessions.insert(&session).await?;
        Ok(token)
    }
}

/// Map a unique-index conflict to the signup-facing error.
fn conflict_to_exists(err: RepositoryError) -> AuthError {
    match err {
        RepositoryError::Conflict(_) => AuthError::AlreadyExists,
        other => AuthError::Repository(other),
    }
}

/// Random opaque bearer token, base64url without padding.
fn generate_token() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Enforce the password strength policy.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` with a client-safe message.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored Argon2 hash.
///
/// An unparseable hash verifies as `false` rather than erroring; the stored
/// hash is server data and a corrupt one must not become a 500 on login.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
