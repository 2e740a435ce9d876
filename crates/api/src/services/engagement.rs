//! Engagement ledger: membership lists and their denormalized counters.
//!
//! Posts and comments carry a `like_list` with a `num_likes` counter, and
//! users carry `followers`/`following` lists. The rule everywhere is the
//! same: a set-membership change and its counter change must ride in one
//! per-document atomic update, guarded by a membership condition in the
//! filter. That makes each toggle race-free on its own document: the counter
//! always equals the list length and can never go below zero.
//!
//! A toggle runs at most two conditional updates:
//!
//! 1. match the target only if the member is absent, then `$addToSet` +
//!    `$inc +1` - if this modified a document the outcome is [`Toggle::Engaged`];
//! 2. otherwise match only if the member is present, then `$pull` +
//!    `$inc -1` - if this modified a document the outcome is
//!    [`Toggle::Disengaged`];
//! 3. if neither matched, the target document does not exist.

use mongodb::Collection;
use mongodb::bson::{Bson, Document, doc};
use serde::Serialize;

use crate::db::RepositoryError;

/// Outcome of a toggle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    /// The member was inserted (liked / followed).
    Engaged,
    /// The member was removed (unliked / unfollowed).
    Disengaged,
}

/// Field layout of one membership ledger on a document.
#[derive(Debug, Clone, Copy)]
pub struct ToggleSpec {
    /// Array field holding the member ids.
    pub list_field: &'static str,
    /// Counter field kept equal to the array length, if the ledger has one.
    pub counter_field: Option<&'static str>,
}

/// Likes on a post.
pub const POST_LIKES: ToggleSpec = ToggleSpec {
    list_field: "like_list",
    counter_field: Some("num_likes"),
};

/// Likes on a comment.
pub const COMMENT_LIKES: ToggleSpec = ToggleSpec {
    list_field: "like_list",
    counter_field: Some("num_likes"),
};

/// Comment references on a post.
pub const POST_COMMENTS: ToggleSpec = ToggleSpec {
    list_field: "comments_list",
    counter_field: Some("num_comments"),
};

/// Followers of a user (no counter; cardinality is derived at read time).
pub const FOLLOWERS: ToggleSpec = ToggleSpec {
    list_field: "followers",
    counter_field: None,
};

impl ToggleSpec {
    /// Filter matching the target only when `member` is absent from the list.
    #[must_use]
    pub fn insert_filter(&self, target: impl Into<Bson>, member: impl Into<Bson>) -> Document {
        let mut filter = doc! { "_id": target.into() };
        filter.insert(self.list_field, doc! { "$ne": member.into() });
        filter
    }

    /// Update inserting `member` and bumping the counter by one.
    #[must_use]
    pub fn insert_update(&self, member: impl Into<Bson>) -> Document {
        let mut add = Document::new();
        add.insert(self.list_field, member.into());
        let mut update = doc! { "$addToSet": add };
        if let Some(counter) = self.counter_field {
            let mut inc = Document::new();
            inc.insert(counter, 1_i64);
            update.insert("$inc", inc);
        }
        update
    }

    /// Filter matching the target only when `member` is present in the list.
    #[must_use]
    pub fn remove_filter(&self, target: impl Into<Bson>, member: impl Into<Bson>) -> Document {
        let mut filter = doc! { "_id": target.into() };
        filter.insert(self.list_field, member.into());
        filter
    }

    /// Update removing `member` and dropping the counter by one.
    #[must_use]
    pub fn remove_update(&self, member: impl Into<Bson>) -> Document {
        let mut pull = Document::new();
        pull.insert(self.list_field, member.into());
        let mut update = doc! { "$pull": pull };
        if let Some(counter) = self.counter_field {
            let mut inc = Document::new();
            inc.insert(counter, -1_i64);
            update.insert("$inc", inc);
        }
        update
    }
}

/// Toggle `member`'s presence in a ledger on the `target` document.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the target document does not
/// exist, or `RepositoryError::Database` if an update fails.
pub async fn toggle_membership<T: Send + Sync>(
    coll: &Collection<T>,
    spec: ToggleSpec,
    target: impl Into<Bson> + Copy,
    member: impl Into<Bson> + Copy,
) -> Result<Toggle, RepositoryError> {
    let inserted = coll
        .update_one(spec.insert_filter(target, member), spec.insert_update(member))
        .await?;
    if inserted.modified_count == 1 {
        return Ok(Toggle::Engaged);
    }

    let removed = coll
        .update_one(spec.remove_filter(target, member), spec.remove_update(member))
        .await?;
    if removed.modified_count == 1 {
        return Ok(Toggle::Disengaged);
    }

    Err(RepositoryError::NotFound)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    /// In-memory model of the two-branch toggle protocol, used to check the
    /// parity and counter invariants the conditional updates guarantee.
    fn model_toggle(list: &mut Vec<ObjectId>, counter: &mut i64, member: ObjectId) -> Toggle {
        if list.contains(&member) {
            list.retain(|m| *m != member);
            *counter -= 1;
            Toggle::Disengaged
        } else {
            list.push(member);
            *counter += 1;
            Toggle::Engaged
        }
    }

    #[test]
    fn insert_update_bumps_counter_with_add_to_set() {
        let member = ObjectId::new();
        let update = POST_LIKES.insert_update(member);
        assert_eq!(
            update,
            doc! {
                "$addToSet": { "like_list": member },
                "$inc": { "num_likes": 1_i64 },
            }
        );
    }

    #[test]
    fn remove_update_drops_counter_with_pull() {
        let member = ObjectId::new();
        let update = COMMENT_LIKES.remove_update(member);
        assert_eq!(
            update,
            doc! {
                "$pull": { "like_list": member },
                "$inc": { "num_likes": -1_i64 },
            }
        );
    }

    #[test]
    fn follower_updates_have_no_counter() {
        let member = ObjectId::new();
        assert_eq!(
            FOLLOWERS.insert_update(member),
            doc! { "$addToSet": { "followers": member } }
        );
        assert_eq!(
            FOLLOWERS.remove_update(member),
            doc! { "$pull": { "followers": member } }
        );
    }

    #[test]
    fn filters_guard_on_membership() {
        let target = ObjectId::new();
        let member = ObjectId::new();
        assert_eq!(
            POST_LIKES.insert_filter(target, member),
            doc! { "_id": target, "like_list": { "$ne": member } }
        );
        assert_eq!(
            POST_LIKES.remove_filter(target, member),
            doc! { "_id": target, "like_list": member }
        );
    }

    #[test]
    fn odd_number_of_toggles_leaves_member_present() {
        let member = ObjectId::new();
        let mut list = Vec::new();
        let mut counter = 0_i64;

        for round in 1..=5 {
            let outcome = model_toggle(&mut list, &mut counter, member);
            let expected = if round % 2 == 1 {
                Toggle::Engaged
            } else {
                Toggle::Disengaged
            };
            assert_eq!(outcome, expected);
            // The counter always matches the list cardinality
            assert_eq!(counter, i64::try_from(list.len()).unwrap());
            assert_eq!(list.contains(&member), round % 2 == 1);
        }
    }

    #[test]
    fn two_toggles_restore_original_state() {
        let member = ObjectId::new();
        let bystander = ObjectId::new();
        let mut list = vec![bystander];
        let mut counter = 1_i64;

        model_toggle(&mut list, &mut counter, member);
        model_toggle(&mut list, &mut counter, member);

        assert_eq!(list, vec![bystander]);
        assert_eq!(counter, 1);
    }

    #[test]
    fn counter_never_goes_negative() {
        let member = ObjectId::new();
        let mut list = Vec::new();
        let mut counter = 0_i64;

        // A remove only fires when the member is present, so repeated
        // toggles from empty can never drive the counter below zero.
        for _ in 0..10 {
            model_toggle(&mut list, &mut counter, member);
            assert!(counter >= 0);
        }
    }
}
