//! Character and relationship definitions.

use serde::{Deserialize, Serialize};

use super::{CharacterId, NovelId, RelationshipId};

/// A character belonging to exactly one novel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub novel: NovelId,
    pub name: String,
}

/// Fields needed to insert a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCharacter {
    pub novel: NovelId,
    pub name: String,
}

impl NewCharacter {
    pub fn new(novel: NovelId, name: impl Into<String>) -> Self {
        Self {
            novel,
            name: name.into(),
        }
    }
}

/// A directional relationship from `character1` to `character2`.
///
/// At most one relationship exists per ordered pair; the reverse pair is a
/// different relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub character1: CharacterId,
    pub character2: CharacterId,
}

impl Relationship {
    /// Check if the relationship touches a character from either side.
    pub fn involves(&self, character: CharacterId) -> bool {
        self.character1 == character || self.character2 == character
    }
}

/// Fields needed to insert a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelationship {
    pub character1: CharacterId,
    pub character2: CharacterId,
}

impl NewRelationship {
    pub fn new(character1: CharacterId, character2: CharacterId) -> Self {
        Self {
            character1,
            character2,
        }
    }
}
