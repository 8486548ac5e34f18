use novel_model::{Actor, Description, DescriptionId, DescriptionOwner, EntityKind, NewDescription};
use tracing::{info, warn};

use super::{DescriptionDetail, NovelRecorder};
use crate::access::NovelEntity;
use crate::descriptions::{insert_description, DescriptionDraft, DescriptionPatch};
use crate::error::{Access, RecorderError, RecorderResult};

impl NovelRecorder {
    /// Add a description to a character or relationship.
    ///
    /// The form is validated before access is checked, so a malformed
    /// request is reported as such whoever sends it.
    pub fn create_description(
        &mut self,
        actor: &Actor,
        draft: DescriptionDraft,
    ) -> RecorderResult<Description> {
        let owner = draft.validate()?;
        let author = Self::require_login(actor)?;
        if !self.evaluator().can_create_description(actor, owner)? {
            warn!(user = %author, ?owner, "description creation denied");
            return Err(RecorderError::AccessDenied {
                kind: EntityKind::Description,
                access: Access::Write,
            });
        }

        let new = NewDescription::new(owner, author, draft.title).with_content(draft.content);
        let id = self
            .store
            .transaction(|store| insert_description(store, new))?;
        info!(description = %id, ?owner, "description created");
        Ok(self.store.description(id)?.clone())
    }

    /// Change title and/or content. Owner and author never change.
    pub fn update_description(
        &mut self,
        actor: &Actor,
        id: DescriptionId,
        patch: DescriptionPatch,
    ) -> RecorderResult<Description> {
        self.require(actor, true, NovelEntity::Description(self.store.description(id)?))?;
        patch.validate()?;
        self.store
            .update_description_text(id, patch.title, patch.content)?;
        info!(description = %id, "description updated");
        Ok(self.store.description(id)?.clone())
    }

    /// Delete a description that is not its owner's primary one.
    pub fn delete_description(
        &mut self,
        actor: &Actor,
        id: DescriptionId,
    ) -> RecorderResult<Description> {
        let description = self.store.description(id)?;
        self.require(actor, true, NovelEntity::Description(description))?;
        let primary = self.resolver().primary_description(description.owner()?)?;
        if primary.id == id {
            return Err(RecorderError::validation(
                "description",
                "You can't delete a primary description.",
            ));
        }
        let description = self.store.delete_description(id)?;
        info!(description = %id, "description deleted");
        Ok(description)
    }

    pub fn description_detail(
        &self,
        actor: &Actor,
        id: DescriptionId,
    ) -> RecorderResult<DescriptionDetail> {
        let description = self.store.description(id)?;
        let entity = NovelEntity::Description(description);
        self.require(actor, false, entity)?;
        Ok(DescriptionDetail {
            description: description.clone(),
            writable: self.writable(actor, entity)?,
        })
    }

    /// Descriptions of a character or relationship, primary first.
    pub fn owner_descriptions(
        &self,
        actor: &Actor,
        owner: DescriptionOwner,
    ) -> RecorderResult<Vec<Description>> {
        self.require(actor, false, NovelEntity::from_owner(&self.store, owner)?)?;
        Ok(self
            .store
            .descriptions_of(owner)
            .into_iter()
            .cloned()
            .collect())
    }
}
