use novel_model::{
    Actor, Character, CharacterId, DescriptionOwner, NewCharacter, NewDescription, NovelId,
};
use std::collections::BTreeSet;
use tracing::info;

use super::{CharacterCard, CharacterDetail, CharacterDraft, NovelRecorder, RelationshipCard};
use crate::access::NovelEntity;
use crate::descriptions::insert_description;
use crate::error::{RecorderError, RecorderResult};
use crate::validation::check_name;

impl NovelRecorder {
    /// Create a character together with its first description.
    pub fn create_character(
        &mut self,
        actor: &Actor,
        draft: CharacterDraft,
    ) -> RecorderResult<Character> {
        let author = Self::require_login(actor)?;
        let novel = draft.novel;
        self.require(actor, true, NovelEntity::Novel(self.store.novel(novel)?))?;
        draft.validate()?;

        let id = self.store.transaction(|store| {
            let id = store.insert_character(NewCharacter::new(novel, draft.name))?;
            let owner = DescriptionOwner::Character(id);
            insert_description(
                store,
                NewDescription::new(owner, author, draft.description_title)
                    .with_content(draft.description_content),
            )?;
            Ok::<_, RecorderError>(id)
        })?;
        info!(character = %id, %novel, "character created");
        Ok(self.store.character(id)?.clone())
    }

    pub fn rename_character(
        &mut self,
        actor: &Actor,
        id: CharacterId,
        name: impl Into<String>,
    ) -> RecorderResult<Character> {
        let name = name.into();
        self.require(actor, true, NovelEntity::Character(self.store.character(id)?))?;
        check_name("name", &name)?;
        self.store.rename_character(id, name)?;
        info!(character = %id, "character renamed");
        Ok(self.store.character(id)?.clone())
    }

    /// Delete a character no relationship refers to, with its descriptions.
    pub fn delete_character(
        &mut self,
        actor: &Actor,
        id: CharacterId,
    ) -> RecorderResult<Character> {
        self.require(actor, true, NovelEntity::Character(self.store.character(id)?))?;
        let character = self.store.delete_character(id)?;
        info!(character = %id, novel = %character.novel, "character deleted");
        Ok(character)
    }

    pub fn character_detail(
        &self,
        actor: &Actor,
        id: CharacterId,
    ) -> RecorderResult<CharacterDetail> {
        let character = self.store.character(id)?;
        let entity = NovelEntity::Character(character);
        self.require(actor, false, entity)?;

        let descriptions = self
            .store
            .descriptions_of(DescriptionOwner::Character(id))
            .into_iter()
            .cloned()
            .collect();
        let relationships = self.relationship_cards(id)?;
        let related: BTreeSet<CharacterId> = relationships.iter().map(|r| r.character2).collect();
        let characters_without_relationship = self
            .character_cards(character.novel)?
            .into_iter()
            .filter(|card| card.id != id && !related.contains(&card.id))
            .collect();

        Ok(CharacterDetail {
            character: character.clone(),
            writable: self.writable(actor, entity)?,
            descriptions,
            relationships,
            characters_without_relationship,
        })
    }

    /// Characters of a novel, by name, with their primary descriptions.
    pub fn novel_characters(
        &self,
        actor: &Actor,
        novel: NovelId,
    ) -> RecorderResult<Vec<CharacterCard>> {
        self.require(actor, false, NovelEntity::Novel(self.store.novel(novel)?))?;
        self.character_cards(novel)
    }

    pub(super) fn character_cards(&self, novel: NovelId) -> RecorderResult<Vec<CharacterCard>> {
        self.store
            .characters_of(novel)
            .into_iter()
            .map(|character| CharacterCard::build(&self.store, character))
            .collect()
    }

    pub(super) fn relationship_cards(
        &self,
        character1: CharacterId,
    ) -> RecorderResult<Vec<RelationshipCard>> {
        self.store
            .relationships_from(character1)
            .into_iter()
            .map(|relationship| RelationshipCard::build(&self.store, relationship))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{cast, grant, not_found_kind};
    use super::super::{NovelDraft, RelationshipDraft};
    use crate::error::ErrorClass;
    use novel_model::{Actor, EntityKind, PermissionLevel};

    use super::*;

    #[test]
    fn test_character_created_with_primary_description() {
        let mut cast = cast();
        let novel = cast
            .recorder
            .create_novel(&cast.author, NovelDraft::new("Dune"))
            .unwrap();
        let paul = cast
            .recorder
            .create_character(
                &cast.author,
                CharacterDraft::new(novel.id, "Paul", "Heir")
                    .with_description_content("Son of Leto"),
            )
            .unwrap();

        let cards = cast
            .recorder
            .novel_characters(&Actor::Anonymous, novel.id)
            .unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].primary_description_title, "Heir");
        assert_eq!(cards[0].primary_description_content, "Son of Leto");

        let detail = cast.recorder.character_detail(&cast.author, paul.id).unwrap();
        assert!(detail.writable);
        assert_eq!(detail.descriptions.len(), 1);
        assert!(detail.descriptions[0].is_primary);
        assert!(cast.author.is(detail.descriptions[0].author));
    }

    #[test]
    fn test_invalid_character_leaves_no_rows() {
        let mut cast = cast();
        let novel = cast
            .recorder
            .create_novel(&cast.author, NovelDraft::new("Dune"))
            .unwrap();
        cast.recorder
            .create_character(&cast.author, CharacterDraft::new(novel.id, "Paul", "Heir"))
            .unwrap();

        let err = cast
            .recorder
            .create_character(&cast.author, CharacterDraft::new(novel.id, "Paul", "Twin"))
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Conflict);
        let err = cast
            .recorder
            .create_character(&cast.author, CharacterDraft::new(novel.id, "Alia", " "))
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);

        let counts = cast.recorder.store().counts();
        assert_eq!(counts.characters, 1);
        assert_eq!(counts.descriptions, 1);
    }

    #[test]
    fn test_character_writes_need_coeditor() {
        let mut cast = cast();
        let novel = cast
            .recorder
            .create_novel(&cast.author, NovelDraft::new("Dune"))
            .unwrap();
        let draft = CharacterDraft::new(novel.id, "Paul", "Heir");

        grant(&mut cast, novel.id, PermissionLevel::DescriptionOnly);
        let err = cast
            .recorder
            .create_character(&cast.collaborator, draft.clone())
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::AccessDenied);

        grant(&mut cast, novel.id, PermissionLevel::Coeditor);
        let paul = cast
            .recorder
            .create_character(&cast.collaborator, draft)
            .unwrap();
        let renamed = cast
            .recorder
            .rename_character(&cast.collaborator, paul.id, "Muad'Dib")
            .unwrap();
        assert_eq!(renamed.name, "Muad'Dib");
        assert!(cast
            .recorder
            .rename_character(&cast.author, paul.id, "")
            .is_err());
    }

    #[test]
    fn test_delete_character_protected_by_relationship() {
        let mut cast = cast();
        let novel = cast
            .recorder
            .create_novel(&cast.author, NovelDraft::new("Dune"))
            .unwrap();
        let paul = cast
            .recorder
            .create_character(&cast.author, CharacterDraft::new(novel.id, "Paul", "Heir"))
            .unwrap();
        let chani = cast
            .recorder
            .create_character(&cast.author, CharacterDraft::new(novel.id, "Chani", "Fremen"))
            .unwrap();
        cast.recorder
            .create_relationship(&cast.author, RelationshipDraft::new(paul.id, chani.id, "Lovers"))
            .unwrap();

        let err = cast
            .recorder
            .delete_character(&cast.author, chani.id)
            .unwrap_err();
        assert!(matches!(err, RecorderError::Protected { .. }));

        let err = cast.recorder.delete_novel(&cast.author, novel.id).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Conflict);
    }

    #[test]
    fn test_delete_character_cascades_descriptions() {
        let mut cast = cast();
        let novel = cast
            .recorder
            .create_novel(&cast.author, NovelDraft::new("Dune"))
            .unwrap();
        let paul = cast
            .recorder
            .create_character(&cast.author, CharacterDraft::new(novel.id, "Paul", "Heir"))
            .unwrap();

        cast.recorder.delete_character(&cast.author, paul.id).unwrap();
        assert_eq!(cast.recorder.store().counts().descriptions, 0);
        let err = cast
            .recorder
            .character_detail(&cast.author, paul.id)
            .unwrap_err();
        assert_eq!(not_found_kind(&err), Some(EntityKind::Character));
        cast.recorder.delete_novel(&cast.author, novel.id).unwrap();
    }

    #[test]
    fn test_characters_without_relationship() {
        let mut cast = cast();
        let novel = cast
            .recorder
            .create_novel(&cast.author, NovelDraft::new("Dune"))
            .unwrap();
        let mut create = |name: &str| {
            cast.recorder
                .create_character(&cast.author, CharacterDraft::new(novel.id, name, "Someone"))
                .unwrap()
                .id
        };
        let paul = create("Paul");
        let chani = create("Chani");
        let jessica = create("Jessica");
        cast.recorder
            .create_relationship(&cast.author, RelationshipDraft::new(paul, chani, "Lovers"))
            .unwrap();

        let detail = cast.recorder.character_detail(&cast.author, paul).unwrap();
        assert_eq!(detail.relationships.len(), 1);
        assert_eq!(detail.relationships[0].character2_name, "Chani");
        assert_eq!(detail.relationships[0].relationship_display, "Paul -> Chani");
        let others: Vec<_> = detail
            .characters_without_relationship
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(others, vec![jessica]);
    }

    #[test]
    fn test_private_characters_hidden_from_anonymous() {
        let mut cast = cast();
        let novel = cast
            .recorder
            .create_novel(&cast.author, NovelDraft::new("Dune").private())
            .unwrap();
        let paul = cast
            .recorder
            .create_character(&cast.author, CharacterDraft::new(novel.id, "Paul", "Heir"))
            .unwrap();

        assert!(matches!(
            cast.recorder.character_detail(&Actor::Anonymous, paul.id),
            Err(RecorderError::LoginRequired)
        ));
        assert!(matches!(
            cast.recorder.novel_characters(&cast.collaborator, novel.id),
            Err(RecorderError::AccessDenied { .. })
        ));
    }
}
