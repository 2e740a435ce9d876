//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use thiserror::Error;

/// Error returned when an ID string is not a valid 24-character hex ObjectId.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed id: {0:?}")]
pub struct IdError(pub String);

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around a BSON `ObjectId` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `generate()` for new documents and `parse()` for client-supplied hex
/// - `From<ObjectId>` in both directions, plus `From<Self> for Bson` so IDs
///   can be used directly inside `doc!` filters
///
/// # Example
///
/// ```rust
/// # use foodie_eats_core::define_id;
/// define_id!(UserId);
/// define_id!(PostId);
///
/// let user_id = UserId::generate();
///
/// // These are different types, so this won't compile:
/// // let _: PostId = user_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::bson::oid::ObjectId);

        impl $name {
            /// Create an ID from an existing `ObjectId`.
            #[must_use]
            pub const fn new(id: ::bson::oid::ObjectId) -> Self {
                Self(id)
            }

            /// Generate a fresh ID for a new document.
            #[must_use]
            pub fn generate() -> Self {
                Self(::bson::oid::ObjectId::new())
            }

            /// Parse an ID from its 24-character hex representation.
            ///
            /// # Errors
            ///
            /// Returns [`IdError`] if the input is not valid ObjectId hex.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                ::bson::oid::ObjectId::parse_str(s)
                    .map(Self)
                    .map_err(|_| $crate::types::id::IdError(s.to_owned()))
            }

            /// Get the underlying `ObjectId`.
            #[must_use]
            pub const fn as_object_id(&self) -> ::bson::oid::ObjectId {
                self.0
            }

            /// Hex representation, as exposed to API clients.
            #[must_use]
            pub fn to_hex(&self) -> ::std::string::String {
                self.0.to_hex()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl From<::bson::oid::ObjectId> for $name {
            fn from(id: ::bson::oid::ObjectId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::bson::oid::ObjectId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<$name> for ::bson::Bson {
            fn from(id: $name) -> Self {
                Self::ObjectId(id.0)
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(PostId);
define_id!(CommentId);
define_id!(RestaurantId);
define_id!(OwnerId);
define_id!(DishId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_through_hex() {
        let id = UserId::generate();
        let parsed = UserId::parse(&id.to_hex()).expect("hex should parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(UserId::parse("not-an-id").is_err());
        assert!(UserId::parse("").is_err());
        // Too short
        assert!(UserId::parse("abc123").is_err());
    }

    #[test]
    fn display_is_hex() {
        let id = PostId::generate();
        assert_eq!(id.to_string(), id.to_hex());
        assert_eq!(id.to_string().len(), 24);
    }

    #[test]
    fn converts_into_bson_object_id() {
        let id = CommentId::generate();
        let bson: bson::Bson = id.into();
        assert_eq!(bson, bson::Bson::ObjectId(id.as_object_id()));
    }
}
