//! Read models returned by the recorder.

use novel_model::{
    Character, CharacterId, Description, DescriptionOwner, Novel, NovelStore, Relationship,
    RelationshipId,
};
use serde::Serialize;

use crate::descriptions::PrimaryDescriptionResolver;
use crate::error::{RecorderError, RecorderResult};

/// A character with the title and content of its primary description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterCard {
    pub id: CharacterId,
    pub name: String,
    pub primary_description_title: String,
    pub primary_description_content: String,
}

impl CharacterCard {
    pub(crate) fn build(store: &NovelStore, character: &Character) -> RecorderResult<Self> {
        let primary = PrimaryDescriptionResolver::new(store)
            .primary_description(DescriptionOwner::Character(character.id))?;
        Ok(Self {
            id: character.id,
            name: character.name.clone(),
            primary_description_title: primary.title.clone(),
            primary_description_content: primary.content.clone(),
        })
    }
}

/// An outgoing relationship seen from its first character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipCard {
    pub id: RelationshipId,
    pub character2: CharacterId,
    pub character2_name: String,
    pub relationship_display: String,
    pub primary_description_title: String,
    pub primary_description_content: String,
}

impl RelationshipCard {
    pub(crate) fn build(store: &NovelStore, relationship: &Relationship) -> RecorderResult<Self> {
        let target = store
            .character(relationship.character2)
            .map_err(|e| RecorderError::from(e).dangling())?;
        let primary = PrimaryDescriptionResolver::new(store)
            .primary_description(DescriptionOwner::Relationship(relationship.id))?;
        Ok(Self {
            id: relationship.id,
            character2: target.id,
            character2_name: target.name.clone(),
            relationship_display: relationship_display(store, relationship)?,
            primary_description_title: primary.title.clone(),
            primary_description_content: primary.content.clone(),
        })
    }
}

/// `"<character1> -> <character2>"`.
pub fn relationship_display(
    store: &NovelStore,
    relationship: &Relationship,
) -> RecorderResult<String> {
    let name = |id| {
        store
            .character(id)
            .map(|c| c.name.clone())
            .map_err(|e| RecorderError::from(e).dangling())
    };
    Ok(format!(
        "{} -> {}",
        name(relationship.character1)?,
        name(relationship.character2)?
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NovelDetail {
    pub novel: Novel,
    /// Whether the requesting actor may modify the novel.
    pub writable: bool,
    pub characters: Vec<CharacterCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterDetail {
    pub character: Character,
    pub writable: bool,
    pub descriptions: Vec<Description>,
    pub relationships: Vec<RelationshipCard>,
    /// Characters of the same novel this character has no relationship to yet.
    pub characters_without_relationship: Vec<CharacterCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipDetail {
    pub relationship: Relationship,
    pub relationship_display: String,
    pub writable: bool,
    pub descriptions: Vec<Description>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionDetail {
    pub description: Description,
    pub writable: bool,
}

/// Site-wide counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SiteSummary {
    pub num_novels: usize,
    pub num_characters: usize,
    pub num_descriptions: usize,
    pub num_relationships: usize,
    /// Users owning at least one novel.
    pub num_authors: usize,
}
