//! Business logic: auth, engagement ledgers, ownership, ratings, speech.

pub mod auth;
pub mod engagement;
pub mod ownership;
pub mod ratings;
pub mod speech;

pub use auth::{AuthError, AuthService};
pub use engagement::{Toggle, toggle_membership};
pub use ownership::{Owned, verify_ownership};
pub use ratings::{add_rating, restaurant_average};
pub use speech::{AudioUpload, SpeechError, TranscriptionService};
