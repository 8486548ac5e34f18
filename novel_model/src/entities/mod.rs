//! Entity definitions for recorded novels.

mod character;
mod description;
mod novel;
mod user;

pub use character::*;
pub use description::*;
pub use novel::*;
pub use user::*;

use serde::{Deserialize, Serialize};

macro_rules! storage_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// The raw identity value assigned by the store.
            pub fn value(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

storage_id!(
    /// Identity of a stored novel.
    NovelId
);
storage_id!(
    /// Identity of a stored character.
    CharacterId
);
storage_id!(
    /// Identity of a stored relationship.
    RelationshipId
);
storage_id!(
    /// Identity of a stored description.
    DescriptionId
);

/// Kinds of rows held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Novel,
    Character,
    Relationship,
    Description,
    Permission,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Novel => "novel",
            EntityKind::Character => "character",
            EntityKind::Relationship => "relationship",
            EntityKind::Description => "description",
            EntityKind::Permission => "permission",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_order_by_value() {
        assert!(DescriptionId(3) < DescriptionId(10));
        assert_eq!(NovelId(7).value(), 7);
        assert_eq!(CharacterId(42).to_string(), "42");
    }

    #[test]
    fn test_ids_serialize_as_integers() {
        let json = serde_json::to_string(&RelationshipId(5)).unwrap();
        assert_eq!(json, "5");
        let back: RelationshipId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RelationshipId(5));
    }
}
