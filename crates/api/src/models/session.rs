//! Session documents and the request-scoped actor identity.

use chrono::{DateTime, Duration, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Who a token was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Owner,
}

/// A bearer-token session as stored in the `sessions` collection.
///
/// The token itself is the `_id`, so uniqueness comes for free.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    pub token: String,
    pub subject_id: ObjectId,
    pub role: Role,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Token lifetime.
    pub const TTL_HOURS: i64 = 1;

    /// Create a session expiring [`Self::TTL_HOURS`] from now.
    #[must_use]
    pub fn issue(token: String, subject_id: ObjectId, role: Role) -> Self {
        Self {
            token,
            subject_id,
            role,
            expires_at: Utc::now() + Duration::hours(Self::TTL_HOURS),
        }
    }

    /// Whether the session has expired as of `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// The identity this session proves.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        Actor {
            subject_id: self.subject_id,
            role: self.role,
        }
    }
}

/// The authenticated identity threaded explicitly through handlers.
///
/// Extracted from the bearer token by `RequireAuth`; handlers never read
/// identity from anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub subject_id: ObjectId,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_session_expires_in_one_hour() {
        let session = Session::issue("tok".to_string(), ObjectId::new(), Role::User);
        let now = Utc::now();
        assert!(!session.is_expired_at(now));
        assert!(session.is_expired_at(now + Duration::hours(1) + Duration::seconds(1)));
    }

    #[test]
    fn actor_carries_subject_and_role() {
        let subject = ObjectId::new();
        let session = Session::issue("tok".to_string(), subject, Role::Owner);
        let actor = session.actor();
        assert_eq!(actor.subject_id, subject);
        assert_eq!(actor.role, Role::Owner);
    }
}
