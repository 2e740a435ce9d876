//! Authorship checks for user-generated content.
//!
//! A post or comment may only be deleted by the user who wrote it. The check
//! compares the authenticated actor against the `user_id` stamped on the
//! document at creation time; role alone is never enough.

use foodie_eats_core::UserId;

use crate::error::AppError;
use crate::models::{Actor, Comment, Post, Role};

/// Content with a single authoring user.
pub trait Owned {
    /// The user who created this resource.
    fn owner_id(&self) -> UserId;

    /// Noun used in error messages ("post", "comment").
    fn kind(&self) -> &'static str;
}

impl Owned for Post {
    fn owner_id(&self) -> UserId {
        self.user_id
    }

    fn kind(&self) -> &'static str {
        "post"
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> UserId {
        self.user_id
    }

    fn kind(&self) -> &'static str {
        "comment"
    }
}

/// Require that `actor` is the author of `resource`.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the actor is not a user account or is
/// a different user than the author.
pub fn verify_ownership(actor: &Actor, resource: &impl Owned) -> Result<(), AppError> {
    if actor.role != Role::User || actor.subject_id != resource.owner_id().as_object_id() {
        return Err(AppError::Forbidden(format!(
            "only the author may modify this {}",
            resource.kind()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use foodie_eats_core::{CommentId, DishId, PostId, Rating, RestaurantId};

    fn post_by(author: UserId) -> Post {
        Post {
            id: PostId::generate(),
            user_id: author,
            restaurant_id: RestaurantId::generate(),
            dish_id: DishId::generate(),
            title: "Best ramen in town".to_string(),
            description: String::new(),
            rating: Rating::new(5).unwrap(),
            image_url: None,
            like_list: vec![],
            num_likes: 0,
            comments_list: vec![],
            num_comments: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn author_passes() {
        let author = UserId::generate();
        let actor = Actor {
            subject_id: author.as_object_id(),
            role: Role::User,
        };
        assert!(verify_ownership(&actor, &post_by(author)).is_ok());
    }

    #[test]
    fn different_user_is_forbidden() {
        let actor = Actor {
            subject_id: UserId::generate().as_object_id(),
            role: Role::User,
        };
        let err = verify_ownership(&actor, &post_by(UserId::generate())).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn owner_role_cannot_act_as_author() {
        // Even with a matching id, an owner session is not a user session.
        let author = UserId::generate();
        let actor = Actor {
            subject_id: author.as_object_id(),
            role: Role::Owner,
        };
        let err = verify_ownership(&actor, &post_by(author)).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn comment_ownership_checks_author() {
        let author = UserId::generate();
        let comment = Comment {
            id: CommentId::generate(),
            post_id: PostId::generate(),
            user_id: author,
            text: "agreed".to_string(),
            like_list: vec![],
            num_likes: 0,
            created_at: Utc::now(),
        };
        let actor = Actor {
            subject_id: author.as_object_id(),
            role: Role::User,
        };
        assert!(verify_ownership(&actor, &comment).is_ok());
    }
}
