//! The closed set of entities access control works on.

use novel_model::{
    Character, Description, DescriptionOwner, EntityKind, Novel, NovelStore, Relationship, UserId,
};

use crate::error::{RecorderError, RecorderResult};

/// A borrowed row that belongs, directly or transitively, to a novel.
#[derive(Debug, Clone, Copy)]
pub enum NovelEntity<'a> {
    Novel(&'a Novel),
    Character(&'a Character),
    Relationship(&'a Relationship),
    Description(&'a Description),
}

impl<'a> NovelEntity<'a> {
    /// Borrow the entity that owns descriptions of `owner`.
    pub fn from_owner(store: &'a NovelStore, owner: DescriptionOwner) -> RecorderResult<Self> {
        Ok(match owner {
            DescriptionOwner::Character(id) => NovelEntity::Character(store.character(id)?),
            DescriptionOwner::Relationship(id) => {
                NovelEntity::Relationship(store.relationship(id)?)
            }
        })
    }

    /// Resolve the novel this entity belongs to.
    ///
    /// A relationship belongs to the novel of its first character; a
    /// description to the novel of its owner.
    pub fn novel(&self, store: &'a NovelStore) -> RecorderResult<&'a Novel> {
        let novel = match *self {
            NovelEntity::Novel(novel) => return Ok(novel),
            NovelEntity::Character(character) => store.novel(character.novel),
            NovelEntity::Relationship(relationship) => {
                let character = store
                    .character(relationship.character1)
                    .map_err(|e| RecorderError::from(e).dangling())?;
                store.novel(character.novel)
            }
            NovelEntity::Description(description) => {
                let owner = NovelEntity::from_owner(store, description.owner()?)
                    .map_err(|e| e.dangling())?;
                return owner.novel(store);
            }
        };
        novel.map_err(|e| RecorderError::from(e).dangling())
    }

    pub fn is_description(&self) -> bool {
        matches!(self, NovelEntity::Description(_))
    }

    /// Author of the entity, if it is a description.
    pub fn description_author(&self) -> Option<UserId> {
        match self {
            NovelEntity::Description(description) => Some(description.author),
            _ => None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            NovelEntity::Novel(_) => EntityKind::Novel,
            NovelEntity::Character(_) => EntityKind::Character,
            NovelEntity::Relationship(_) => EntityKind::Relationship,
            NovelEntity::Description(_) => EntityKind::Description,
        }
    }

    /// Check that the entity is a current row of `store`.
    pub fn is_stored_in(&self, store: &NovelStore) -> bool {
        match *self {
            NovelEntity::Novel(novel) => store.novel(novel.id).is_ok_and(|row| row == novel),
            NovelEntity::Character(character) => store
                .character(character.id)
                .is_ok_and(|row| row == character),
            NovelEntity::Relationship(relationship) => store
                .relationship(relationship.id)
                .is_ok_and(|row| row == relationship),
            NovelEntity::Description(description) => store
                .description(description.id)
                .is_ok_and(|row| row == description),
        }
    }
}
