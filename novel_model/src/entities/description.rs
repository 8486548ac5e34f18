//! Description definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CharacterId, DescriptionId, RelationshipId, UserId};
use crate::store::{StoreError, StoreResult};

/// The entity a description is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionOwner {
    Character(CharacterId),
    Relationship(RelationshipId),
}

/// Free text attached to a character or a relationship.
///
/// The row keeps one nullable link per owner kind. Exactly one of them is set
/// for every description written through the store API; a row with zero or
/// two links can only come from direct manipulation and is reported as a
/// data-integrity error by [`Description::owner`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub id: DescriptionId,
    pub character: Option<CharacterId>,
    pub relationship: Option<RelationshipId>,
    pub author: UserId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// `0` means "not yet initialised"; set to the ID right after insertion.
    pub sort_order: i64,
    pub is_primary: bool,
    pub time_created: DateTime<Utc>,
    pub time_modified: DateTime<Utc>,
}

impl Description {
    /// Resolve the owner link.
    pub fn owner(&self) -> StoreResult<DescriptionOwner> {
        match (self.character, self.relationship) {
            (Some(character), None) => Ok(DescriptionOwner::Character(character)),
            (None, Some(relationship)) => Ok(DescriptionOwner::Relationship(relationship)),
            (None, None) => Err(StoreError::CorruptDescription {
                id: self.id,
                reason: "not bound to any character or relationship",
            }),
            (Some(_), Some(_)) => Err(StoreError::CorruptDescription {
                id: self.id,
                reason: "bound to both a character and a relationship",
            }),
        }
    }

    /// Check whether the description hangs off the given owner.
    pub fn belongs_to(&self, owner: DescriptionOwner) -> bool {
        match owner {
            DescriptionOwner::Character(id) => self.character == Some(id),
            DescriptionOwner::Relationship(id) => self.relationship == Some(id),
        }
    }

    /// Key used to order sibling descriptions.
    pub fn sort_key(&self) -> (i64, DescriptionId) {
        (self.sort_order, self.id)
    }
}

/// Fields needed to insert a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDescription {
    pub owner: DescriptionOwner,
    pub author: UserId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub sort_order: i64,
}

impl NewDescription {
    pub fn new(owner: DescriptionOwner, author: UserId, title: impl Into<String>) -> Self {
        Self {
            owner,
            author,
            title: title.into(),
            content: String::new(),
            sort_order: 0,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Pin an explicit sort order instead of defaulting to the ID.
    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = sort_order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description(
        character: Option<CharacterId>,
        relationship: Option<RelationshipId>,
    ) -> Description {
        let now = Utc::now();
        Description {
            id: DescriptionId(9),
            character,
            relationship,
            author: UserId::new(),
            title: "Appearance".into(),
            content: String::new(),
            sort_order: 9,
            is_primary: false,
            time_created: now,
            time_modified: now,
        }
    }

    #[test]
    fn test_owner_resolution() {
        let on_character = description(Some(CharacterId(1)), None);
        assert_eq!(
            on_character.owner().unwrap(),
            DescriptionOwner::Character(CharacterId(1))
        );
        assert!(on_character.belongs_to(DescriptionOwner::Character(CharacterId(1))));
        assert!(!on_character.belongs_to(DescriptionOwner::Relationship(RelationshipId(1))));

        let on_relationship = description(None, Some(RelationshipId(4)));
        assert_eq!(
            on_relationship.owner().unwrap(),
            DescriptionOwner::Relationship(RelationshipId(4))
        );
    }

    #[test]
    fn test_corrupt_owner_links() {
        let unbound = description(None, None);
        assert!(matches!(
            unbound.owner(),
            Err(StoreError::CorruptDescription { id: DescriptionId(9), .. })
        ));

        let double = description(Some(CharacterId(1)), Some(RelationshipId(1)));
        assert!(double.owner().is_err());
    }

    #[test]
    fn test_sort_key_breaks_ties_by_id() {
        let mut first = description(Some(CharacterId(1)), None);
        let mut second = first.clone();
        first.id = DescriptionId(3);
        first.sort_order = 5;
        second.id = DescriptionId(4);
        second.sort_order = 5;

        assert!(first.sort_key() < second.sort_key());
    }
}
