use novel_model::{
    Actor, CharacterId, DescriptionOwner, NewDescription, NewRelationship, Relationship,
    RelationshipId,
};
use tracing::info;

use super::{
    relationship_display, NovelRecorder, RelationshipCard, RelationshipDetail, RelationshipDraft,
};
use crate::access::NovelEntity;
use crate::descriptions::insert_description;
use crate::error::{RecorderError, RecorderResult};

impl NovelRecorder {
    /// Create a relationship between two characters of one novel together
    /// with its first description.
    pub fn create_relationship(
        &mut self,
        actor: &Actor,
        draft: RelationshipDraft,
    ) -> RecorderResult<Relationship> {
        let author = Self::require_login(actor)?;
        let first = self.store.character(draft.character1)?;
        let second = self.store.character(draft.character2)?;
        self.require(actor, true, NovelEntity::Character(first))?;
        self.require(actor, true, NovelEntity::Character(second))?;
        if first.novel != second.novel {
            return Err(RecorderError::validation(
                "character2",
                "Both characters must belong to the same novel.",
            ));
        }
        draft.validate()?;

        let pair = NewRelationship::new(draft.character1, draft.character2);
        let id = self.store.transaction(|store| {
            let id = store.insert_relationship(pair)?;
            let owner = DescriptionOwner::Relationship(id);
            insert_description(
                store,
                NewDescription::new(owner, author, draft.description_title)
                    .with_content(draft.description_content),
            )?;
            Ok::<_, RecorderError>(id)
        })?;
        info!(
            relationship = %id,
            character1 = %pair.character1,
            character2 = %pair.character2,
            "relationship created"
        );
        Ok(self.store.relationship(id)?.clone())
    }

    /// Delete a relationship with its descriptions.
    pub fn delete_relationship(
        &mut self,
        actor: &Actor,
        id: RelationshipId,
    ) -> RecorderResult<Relationship> {
        self.require(actor, true, NovelEntity::Relationship(self.store.relationship(id)?))?;
        let relationship = self.store.delete_relationship(id)?;
        info!(relationship = %id, "relationship deleted");
        Ok(relationship)
    }

    pub fn relationship_detail(
        &self,
        actor: &Actor,
        id: RelationshipId,
    ) -> RecorderResult<RelationshipDetail> {
        let relationship = self.store.relationship(id)?;
        let entity = NovelEntity::Relationship(relationship);
        self.require(actor, false, entity)?;
        Ok(RelationshipDetail {
            relationship: relationship.clone(),
            relationship_display: relationship_display(&self.store, relationship)?,
            writable: self.writable(actor, entity)?,
            descriptions: self
                .store
                .descriptions_of(DescriptionOwner::Relationship(id))
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    /// Outgoing relationships of a character with their primary descriptions.
    pub fn character_relationships(
        &self,
        actor: &Actor,
        character1: CharacterId,
    ) -> RecorderResult<Vec<RelationshipCard>> {
        self.require(actor, false, NovelEntity::Character(self.store.character(character1)?))?;
        self.relationship_cards(character1)
    }
}
