//! Domain models.
//!
//! Each entity has two shapes: the BSON document stored in MongoDB (with
//! `_id` renames and bson datetime encoding) and a client-facing response
//! type that renders ids as hex strings and never carries credential hashes.

pub mod comment;
pub mod owner;
pub mod post;
pub mod restaurant;
pub mod session;
pub mod user;

pub use comment::{Comment, CommentResponse};
pub use owner::{Owner, OwnerResponse};
pub use post::{Post, PostResponse};
pub use restaurant::{Coordinates, MenuItem, MenuItemResponse, Restaurant, RestaurantResponse};
pub use session::{Actor, Role, Session};
pub use user::{PrivacySettings, Profile, User, UserResponse};
