//! User account route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use mongodb::bson::{Document, to_bson};
use serde::{Deserialize, Serialize};

use foodie_eats_core::UserId;

use crate::db::{SessionRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, bearer_token};
use crate::models::{Actor, PrivacySettings, Profile, Role, UserResponse};
use crate::routes::invalid_id;
use crate::services::{AuthError, AuthService, Toggle};
use crate::state::AppState;

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Fields a user may change on their own account.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub profile: Option<Profile>,
    pub privacy: Option<PrivacySettings>,
}

/// Successful signup/login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Follow toggle response.
#[derive(Debug, Serialize)]
pub struct FollowResponse {
    /// Whether the actor follows the target after the toggle.
    pub following: bool,
}

/// `POST /users/signup`
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.db());
    let (user, token) = auth
        .register_user(&req.name, &req.username, &req.email, &req.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// `POST /users/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.db());
    let (user, token) = auth.login_user(&req.email, &req.password).await?;
    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// `POST /auth/logout`
///
/// Idempotent: revoking an already-revoked token still succeeds.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode> {
    let token = bearer_token(&headers).ok_or(AppError::Auth(AuthError::MissingToken))?;
    AuthService::new(state.db()).logout(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    let id = UserId::parse(&id).map_err(invalid_id)?;
    let user = UserRepository::new(state.db())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
    Ok(Json(user.into()))
}

/// `PUT /users/{id}` (self only)
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    let id = UserId::parse(&id).map_err(invalid_id)?;
    require_self(&actor, id)?;

    let mut fields = Document::new();
    if let Some(name) = req.name {
        fields.insert("name", name);
    }
    if let Some(profile) = req.profile {
        let profile = to_bson(&profile).map_err(|e| AppError::Internal(e.to_string()))?;
        fields.insert("profile", profile);
    }
    if let Some(privacy) = req.privacy {
        let privacy = to_bson(&privacy).map_err(|e| AppError::Internal(e.to_string()))?;
        fields.insert("privacy", privacy);
    }
    if fields.is_empty() {
        return Err(AppError::Validation("no fields to update".to_string()));
    }

    let users = UserRepository::new(state.db());
    users.apply_update(id, fields).await?;
    let user = users
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
    Ok(Json(user.into()))
}

/// `DELETE /users/{id}` (self only)
///
/// Also revokes every session the account holds.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = UserId::parse(&id).map_err(invalid_id)?;
    require_self(&actor, id)?;

    let deleted = UserRepository::new(state.db()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("user {id}")));
    }
    SessionRepository::new(state.db())
        .delete_for_subject(actor.subject_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /users/{id}/followers` and `DELETE /users/{id}/followers`
///
/// Toggles whether the authenticated user follows `{id}`. The target's
/// `followers` list is the ledger; the actor's `following` list is a mirror
/// written second, so both sides agree after every toggle.
pub async fn toggle_followers(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<FollowResponse>> {
    let target = UserId::parse(&id).map_err(invalid_id)?;
    if actor.role != Role::User {
        return Err(AppError::Forbidden(
            "only user accounts can follow".to_string(),
        ));
    }
    let actor_id = UserId::new(actor.subject_id);
    if actor_id == target {
        return Err(AppError::Validation(
            "you cannot follow yourself".to_string(),
        ));
    }

    let users = UserRepository::new(state.db());
    // Deleted-but-still-holding-a-token accounts must not write into other
    // users' follower lists
    if !users.exists(actor_id).await? {
        return Err(AppError::NotFound("your account no longer exists".to_string()));
    }

    let outcome = users.toggle_follower(target, actor_id).await?;
    let following = outcome == Toggle::Engaged;
    users.set_following(actor_id, target, following).await?;
    Ok(Json(FollowResponse { following }))
}

/// Require that the actor is the user named in the path.
fn require_self(actor: &Actor, id: UserId) -> Result<()> {
    if actor.role != Role::User || actor.subject_id != id.as_object_id() {
        return Err(AppError::Forbidden(
            "you may only modify your own account".to_string(),
        ));
    }
    Ok(())
}
